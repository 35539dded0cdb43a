//! Query building for list endpoints
//!
//! The service filters collections with an OData-style `$filter` parameter.
//! A [`ResourceQuery`] collects the optional filter fields a command was given
//! and turns them into either a direct lookup by id or a filtered list request.

/// API version pinned on every request
pub const API_VERSION: &str = "2019-10-17";

/// Newest executions first
pub const ORDER_BY_REQUEST_TIME_DESC: &str = "_requestTimeInMicros desc";

/// Optional filters for a list request
///
/// Empty strings are treated the same as absent fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceQuery {
    pub id: Option<String>,
    pub name: Option<String>,
    pub status: Option<String>,
    pub project: Option<String>,
    pub nested: bool,
}

/// How a query reaches the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Fetch exactly one resource through its direct link
    ById(String),
    /// Filtered collection request
    List(ListParams),
}

/// Query parameters of a collection request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub filter: Option<String>,
    pub order_by: Option<&'static str>,
}

impl ListParams {
    /// Render as query pairs, `apiVersion` first
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("apiVersion", API_VERSION.to_string())];
        if let Some(filter) = &self.filter {
            query.push(("$filter", filter.clone()));
        }
        if let Some(order_by) = self.order_by {
            query.push(("$orderby", order_by.to_string()));
        }
        query
    }
}

impl ResourceQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn with_nested(mut self, nested: bool) -> Self {
        self.nested = nested;
        self
    }

    /// Build the `$filter` expression, `None` when no field is set
    ///
    /// Clauses appear in the order status, name, nested, project and are
    /// joined with `and`.
    pub fn filter_expression(&self) -> Option<String> {
        let mut clauses = Vec::new();

        if let Some(status) = present(&self.status) {
            clauses.push(clause("status", &status.to_uppercase()));
        }
        if let Some(name) = present(&self.name) {
            clauses.push(clause("name", name));
        }
        if self.nested {
            clauses.push(clause("_nested", "true"));
        }
        if let Some(project) = present(&self.project) {
            clauses.push(clause("project", project));
        }

        if clauses.is_empty() {
            None
        } else {
            Some(clauses.join(" and "))
        }
    }

    /// Resolve to a direct lookup when an id is set, otherwise a list request
    pub fn lookup(&self, order_by: Option<&'static str>) -> Lookup {
        match present(&self.id) {
            Some(id) => Lookup::ById(id.to_string()),
            None => Lookup::List(ListParams {
                filter: self.filter_expression(),
                order_by,
            }),
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn clause(field: &str, value: &str) -> String {
    format!("({} eq {})", field, quote(value))
}

/// OData string literal: single quotes, embedded quotes doubled
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_fields_no_filter() {
        assert_eq!(ResourceQuery::new().filter_expression(), None);
    }

    #[test]
    fn test_single_field() {
        let query = ResourceQuery::new().with_name("vra-authenticateUser");
        assert_eq!(
            query.filter_expression().unwrap(),
            "(name eq 'vra-authenticateUser')"
        );
    }

    #[test]
    fn test_all_fields_in_stable_order() {
        // builder order must not matter
        let query = ResourceQuery::new()
            .with_project("Field Demo")
            .with_nested(true)
            .with_name("deploy")
            .with_status("failed");

        assert_eq!(
            query.filter_expression().unwrap(),
            "(status eq 'FAILED') and (name eq 'deploy') and (_nested eq 'true') and (project eq 'Field Demo')"
        );
    }

    #[test]
    fn test_every_combination_conjoins_only_present_fields() {
        for mask in 0u8..16 {
            let mut query = ResourceQuery::new();
            let mut expected = Vec::new();
            if mask & 1 != 0 {
                query = query.with_status("running");
                expected.push("(status eq 'RUNNING')");
            }
            if mask & 2 != 0 {
                query = query.with_name("n");
                expected.push("(name eq 'n')");
            }
            if mask & 4 != 0 {
                query = query.with_nested(true);
                expected.push("(_nested eq 'true')");
            }
            if mask & 8 != 0 {
                query = query.with_project("p");
                expected.push("(project eq 'p')");
            }

            let expected = if expected.is_empty() {
                None
            } else {
                Some(expected.join(" and "))
            };
            assert_eq!(query.filter_expression(), expected, "mask {mask:04b}");
        }
    }

    #[test]
    fn test_quotes_are_escaped() {
        let query = ResourceQuery::new().with_name("Sam's pipeline");
        assert_eq!(
            query.filter_expression().unwrap(),
            "(name eq 'Sam''s pipeline')"
        );
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let query = ResourceQuery {
            name: Some(String::new()),
            project: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(query.filter_expression(), None);
    }

    #[test]
    fn test_id_bypasses_filters() {
        let query = ResourceQuery::new()
            .with_id("9cc5aedc")
            .with_name("ignored")
            .with_status("failed");

        assert_eq!(
            query.lookup(Some(ORDER_BY_REQUEST_TIME_DESC)),
            Lookup::ById("9cc5aedc".to_string())
        );
    }

    #[test]
    fn test_empty_id_is_a_list() {
        let query = ResourceQuery {
            id: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(query.lookup(None), Lookup::List(_)));
    }

    #[test]
    fn test_list_params_query_pairs() {
        let Lookup::List(params) = ResourceQuery::new()
            .with_status("completed")
            .lookup(Some(ORDER_BY_REQUEST_TIME_DESC))
        else {
            panic!("expected list lookup");
        };

        assert_eq!(
            params.to_query(),
            vec![
                ("apiVersion", API_VERSION.to_string()),
                ("$filter", "(status eq 'COMPLETED')".to_string()),
                ("$orderby", ORDER_BY_REQUEST_TIME_DESC.to_string()),
            ]
        );
    }
}
