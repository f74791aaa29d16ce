//! PostgREST query builder
//!
//! Builds the `/rest/v1/<table>?...` request paths the hosted store
//! understands. Only the operators the portal needs are supported.

use std::fmt;

/// Sort direction for `order=`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// A select against one table
#[derive(Debug, Clone, PartialEq)]
pub struct TableQuery {
    table: String,
    filters: Vec<(String, String)>,
    order: Option<(String, Direction)>,
    limit: Option<usize>,
}

impl TableQuery {
    /// `select=*` on a table
    pub fn select(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Builder method: `column=eq.value`
    pub fn eq(mut self, column: impl Into<String>, value: impl fmt::Display) -> Self {
        self.filters.push((column.into(), format!("eq.{}", value)));
        self
    }

    /// Builder method: `order=column.asc|desc`
    pub fn order(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order = Some((column.into(), direction));
        self
    }

    /// Builder method: `limit=n`
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Encoded query string without the leading `?`
    pub fn query_string(&self) -> String {
        let mut params = vec![format!("select={}", urlencoding::encode("*"))];

        for (column, filter) in &self.filters {
            params.push(format!(
                "{}={}",
                urlencoding::encode(column),
                urlencoding::encode(filter)
            ));
        }

        if let Some((column, direction)) = &self.order {
            params.push(format!(
                "order={}.{}",
                urlencoding::encode(column),
                direction.as_str()
            ));
        }

        if let Some(limit) = self.limit {
            params.push(format!("limit={}", limit));
        }

        params.join("&")
    }

    /// Full request URL under a project base URL
    pub fn url(&self, base_url: &str) -> String {
        format!(
            "{}/rest/v1/{}?{}",
            base_url.trim_end_matches('/'),
            self.table,
            self.query_string()
        )
    }
}

impl fmt::Display for TableQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}?{}", self.table, self.query_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_all_ordered() {
        let q = TableQuery::select("campus_map").order("name", Direction::Asc);
        assert_eq!(q.query_string(), "select=%2A&order=name.asc");
    }

    #[test]
    fn test_single_row_by_id() {
        let q = TableQuery::select("profiles")
            .eq("id", "6f1c7a5e-0d7b-4c55-9d6f-2a3e9b7c1d10")
            .limit(1);
        assert_eq!(
            q.url("https://project.supabase.co/"),
            "https://project.supabase.co/rest/v1/profiles?select=%2A&id=eq.6f1c7a5e-0d7b-4c55-9d6f-2a3e9b7c1d10&limit=1"
        );
    }

    #[test]
    fn test_filter_values_are_encoded() {
        let q = TableQuery::select("services").eq("name", "Mess & Canteen");
        assert!(q.query_string().contains("name=eq.Mess%20%26%20Canteen"));
    }

    #[test]
    fn test_display_includes_table() {
        let q = TableQuery::select("reviews").order("created_at", Direction::Desc);
        assert_eq!(q.to_string(), "reviews?select=%2A&order=created_at.desc");
    }
}
