//! Named query store
//!
//! Saves copies of a builder's pending operators under an id and a name,
//! and loads them back for re-execution. Saved operators are copied by
//! value: later declarations on the builder never change them.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::observability::{log_event_with_fields, Event};
use crate::planner::{ExplainPlan, Operator};
use crate::query::QueryBuilder;
use crate::record::Record;

use super::errors::{SessionError, SessionResult};

/// A saved operator list
#[derive(Debug, Clone)]
pub struct SavedQuery {
    /// Unique query identifier
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Operators in declaration order
    pub operators: Vec<Operator>,
    pub created_at: DateTime<Utc>,
}

impl SavedQuery {
    /// Serializable listing entry with the rendered plan
    pub fn info(&self) -> SavedQueryInfo {
        SavedQueryInfo {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            plan: ExplainPlan::from_operators(&self.operators)
                .steps
                .into_iter()
                .map(|step| format!("{}: {}", step.operator, step.detail))
                .collect(),
            created_at: self.created_at,
        }
    }
}

/// Listing view of a saved query
#[derive(Debug, Clone, Serialize)]
pub struct SavedQueryInfo {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub plan: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// One user's saved queries and the builder they run against.
///
/// Not synchronized; wrap in a `Mutex` to share across threads.
#[derive(Debug)]
pub struct QuerySession {
    pub user_id: String,
    pub name: String,
    saved: Vec<SavedQuery>,
    current: Option<QueryBuilder>,
}

impl QuerySession {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            saved: Vec::new(),
            current: None,
        }
    }

    /// Sets the builder saved queries are taken from and loaded into
    pub fn set_builder(&mut self, builder: QueryBuilder) -> &mut Self {
        self.current = Some(builder);
        self
    }

    pub fn builder_mut(&mut self) -> SessionResult<&mut QueryBuilder> {
        self.current.as_mut().ok_or(SessionError::NoBuilder)
    }

    /// Saves a copy of the builder's pending operators
    pub fn save_query(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> SessionResult<Uuid> {
        let builder = self.current.as_ref().ok_or(SessionError::NoBuilder)?;
        if builder.pending().is_empty() {
            return Err(SessionError::NothingToSave);
        }

        let query = SavedQuery {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            operators: builder.pending().to_vec(),
            created_at: Utc::now(),
        };
        let id = query.id;

        let id_str = id.to_string();
        log_event_with_fields(
            Event::QuerySaved,
            &[("id", id_str.as_str()), ("name", query.name.as_str())],
        );
        self.saved.push(query);
        Ok(id)
    }

    /// Loads a saved query into the builder, replacing its pending operators
    pub fn load_query(&mut self, id: Uuid) -> SessionResult<&mut QueryBuilder> {
        let operators = self
            .get_query(id)
            .ok_or(SessionError::NotFound(id))?
            .operators
            .clone();
        let builder = self.current.as_mut().ok_or(SessionError::NoBuilder)?;

        builder.load_operators(operators);
        let id_str = id.to_string();
        log_event_with_fields(Event::QueryLoaded, &[("id", id_str.as_str())]);
        Ok(builder)
    }

    /// Loads the oldest saved query with `name`
    pub fn load_query_by_name(&mut self, name: &str) -> SessionResult<&mut QueryBuilder> {
        let id = self.find_by_name(name)?;
        self.load_query(id)
    }

    /// Loads and executes a saved query
    pub fn execute_saved_query(&mut self, id: Uuid) -> SessionResult<Vec<Record>> {
        Ok(self.load_query(id)?.execute()?)
    }

    /// Loads and executes the oldest saved query with `name`
    pub fn execute_saved_query_by_name(&mut self, name: &str) -> SessionResult<Vec<Record>> {
        Ok(self.load_query_by_name(name)?.execute()?)
    }

    /// Saved queries, oldest first
    pub fn list_queries(&self) -> &[SavedQuery] {
        &self.saved
    }

    pub fn get_query(&self, id: Uuid) -> Option<&SavedQuery> {
        self.saved.iter().find(|q| q.id == id)
    }

    /// Removes a saved query. Returns false if it did not exist.
    pub fn delete_query(&mut self, id: Uuid) -> bool {
        let before = self.saved.len();
        self.saved.retain(|q| q.id != id);
        self.saved.len() != before
    }

    fn find_by_name(&self, name: &str) -> SessionResult<Uuid> {
        self.saved
            .iter()
            .find(|q| q.name == name)
            .map(|q| q.id)
            .ok_or_else(|| SessionError::NameNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Scalar;

    fn session() -> QuerySession {
        let records = vec![
            Record::from_pairs([("Name", Scalar::str("a")), ("Stars", Scalar::Int(1))]),
            Record::from_pairs([("Name", Scalar::str("b")), ("Stars", Scalar::Int(2))]),
        ];
        let mut session = QuerySession::new("u-1", "analyst");
        session.set_builder(QueryBuilder::new(records));
        session
    }

    #[test]
    fn test_save_requires_builder() {
        let mut session = QuerySession::new("u-1", "analyst");
        assert!(matches!(
            session.save_query("q", ""),
            Err(SessionError::NoBuilder)
        ));
    }

    #[test]
    fn test_save_requires_operators() {
        let mut session = session();
        assert!(matches!(
            session.save_query("q", ""),
            Err(SessionError::NothingToSave)
        ));
    }

    #[test]
    fn test_saved_operators_are_copies() {
        let mut session = session();
        session.builder_mut().unwrap().limit(1);
        let id = session.save_query("top", "first record").unwrap();

        // Mutating the builder afterwards leaves the saved copy alone
        session.builder_mut().unwrap().limit(5);
        assert_eq!(session.get_query(id).unwrap().operators.len(), 1);
    }

    #[test]
    fn test_execute_saved_query() {
        let mut session = session();
        session
            .builder_mut()
            .unwrap()
            .sort("Stars", true)
            .unwrap()
            .limit(1);
        let id = session.save_query("top", "").unwrap();
        session.builder_mut().unwrap().execute().unwrap();

        let rows = session.execute_saved_query(id).unwrap();
        assert_eq!(rows[0].get("Name"), Some(&Scalar::str("b")));

        // Runs again: the saved list survives the builder being cleared
        let rows = session.execute_saved_query_by_name("top").unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_lookup_errors() {
        let mut session = session();
        assert!(matches!(
            session.load_query(Uuid::new_v4()),
            Err(SessionError::NotFound(_))
        ));
        assert!(matches!(
            session.load_query_by_name("missing"),
            Err(SessionError::NameNotFound(_))
        ));
    }

    #[test]
    fn test_delete_query() {
        let mut session = session();
        session.builder_mut().unwrap().limit(1);
        let id = session.save_query("q", "").unwrap();

        assert!(session.delete_query(id));
        assert!(!session.delete_query(id));
        assert!(session.list_queries().is_empty());
    }

    #[test]
    fn test_info_renders_plan() {
        let mut session = session();
        session.builder_mut().unwrap().limit(2);
        let id = session.save_query("q", "two").unwrap();

        let info = session.get_query(id).unwrap().info();
        assert_eq!(info.plan, vec!["LIMIT: 2 records".to_string()]);
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["name"], "q");
    }
}
