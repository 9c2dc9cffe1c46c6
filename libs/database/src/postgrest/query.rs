use super::client::{PostgrestClient, decode, decode_allow_empty};
use crate::common::DatabaseResult;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

/// A filtered read or insert against one table.
///
/// Filters use PostgREST's `column=operator.value` query syntax.
#[derive(Debug)]
pub struct TableQuery<'a> {
    client: &'a PostgrestClient,
    table: String,
    select: Option<String>,
    filters: Vec<(String, String)>,
    limit: Option<usize>,
}

impl<'a> TableQuery<'a> {
    pub(crate) fn new(client: &'a PostgrestClient, table: String) -> Self {
        Self {
            client,
            table,
            select: None,
            filters: Vec::new(),
            limit: None,
        }
    }

    /// Column list or embedding expression, e.g. `user_id,scholarships(*)`.
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.select = Some(columns.into());
        self
    }

    /// `column = value`
    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters
            .push((column.to_string(), format!("eq.{}", value.to_string())));
        self
    }

    /// Array column contains `value`: `cs.{"value"}`
    pub fn contains(mut self, column: &str, value: &str) -> Self {
        self.filters.push((
            column.to_string(),
            format!("cs.{{{}}}", quote_array_element(value)),
        ));
        self
    }

    /// Case-insensitive substring match: `ilike.*term*`
    ///
    /// LIKE metacharacters in `term` are escaped. PostgREST turns every `*`
    /// into `%`, so a literal asterisk degrades to a one-character wildcard
    /// and callers needing exact matches must recheck the rows.
    pub fn ilike_contains(mut self, column: &str, term: &str) -> Self {
        self.filters.push((
            column.to_string(),
            format!("ilike.*{}*", escape_like(term)),
        ));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query-string pairs in the order they will be sent.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![(
            "select".to_string(),
            self.select.clone().unwrap_or_else(|| "*".to_string()),
        )];
        pairs.extend(self.filters.iter().cloned());
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }

    /// `GET /{table}?...`, decoding the row array.
    #[instrument(skip(self), fields(table = %self.table))]
    pub async fn execute<T: DeserializeOwned>(self) -> DatabaseResult<Vec<T>> {
        let pairs = self.query_pairs();
        debug!(?pairs, "Querying store");

        let response = self.client.get(&self.table).query(&pairs).send().await?;
        decode(response).await
    }

    /// `POST /{table}` with `Prefer: return=representation`.
    ///
    /// Returns the inserted rows as echoed by the store; an empty vector
    /// means the store accepted the request but returned nothing.
    #[instrument(skip(self, body), fields(table = %self.table))]
    pub async fn insert<B, T>(self, body: &B) -> DatabaseResult<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(&self.table)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;

        decode_allow_empty(response).await
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        match c {
            '\\' | '%' | '_' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '*' => escaped.push('_'),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn quote_array_element(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}
