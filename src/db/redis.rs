//! Redis connector implementation.
//!
//! Queries are command lines such as `HGETALL user:1`. The line is split by
//! the command tokenizer, sent as a single command, and the reply is
//! flattened into a result table.

use crate::commands::{normalize, tokenize, Reply};
use crate::config::Credentials;
use crate::db::{Connector, QueryResult, Value};
use crate::error::{ProxyError, Result};
use crate::query::Pagination;
use ::redis::{Client, ConnectionInfo, IntoConnectionInfo, ProtocolVersion, Value as RedisValue};
use async_trait::async_trait;
use tracing::debug;
use url::Url;

/// Redis connector. Always uses logical database 0.
///
/// `connect` only prepares the client; the network connection is opened
/// lazily by the first command, so an unreachable server surfaces as a
/// query failure.
pub struct RedisConnector {
    client: Option<Client>,
}

impl RedisConnector {
    /// Creates an unconnected connector.
    pub fn new() -> Self {
        Self { client: None }
    }

    /// Builds `redis://[:password@]host:port/0` from credentials.
    pub fn connection_url(credentials: &Credentials) -> Result<Url> {
        let mut url = Url::parse(&format!(
            "redis://{}:{}/0",
            credentials.host, credentials.port
        ))
        .map_err(|e| ProxyError::connection(format!("Invalid Redis address: {e}")))?;

        if !credentials.password.is_empty() {
            url.set_password(Some(&credentials.password))
                .map_err(|_| ProxyError::connection("Invalid Redis password"))?;
        }

        Ok(url)
    }

    /// Connection settings for `credentials`, negotiating RESP3 so hashes
    /// arrive as maps.
    pub fn connection_info(credentials: &Credentials) -> Result<ConnectionInfo> {
        let mut info = Self::connection_url(credentials)?
            .as_str()
            .into_connection_info()
            .map_err(|e| ProxyError::connection(e.to_string()))?;
        info.redis.protocol = ProtocolVersion::RESP3;
        Ok(info)
    }
}

impl Default for RedisConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Connector for RedisConnector {
    async fn connect(&mut self, credentials: &Credentials) -> Result<()> {
        let info = Self::connection_info(credentials)?;
        let client = Client::open(info).map_err(|e| ProxyError::connection(e.to_string()))?;

        debug!("Prepared Redis client for {}", credentials.host_port());
        self.client = Some(client);
        Ok(())
    }

    /// Pagination does not apply to Redis and is ignored.
    async fn execute_query(&mut self, query: &str, _page: &Pagination) -> Result<QueryResult> {
        let client = self.client.as_ref().ok_or_else(crate::db::not_connected)?;

        let tokens = tokenize(query)?;
        let Some((name, args)) = tokens.split_first() else {
            return Err(ProxyError::query("empty command"));
        };
        debug!("Executing Redis command {name} with {} args", args.len());

        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| ProxyError::query(e.to_string()))?;

        let mut cmd = ::redis::cmd(name);
        for arg in args {
            cmd.arg(arg);
        }

        let reply: RedisValue = cmd
            .query_async(&mut conn)
            .await
            .map_err(|e| ProxyError::query(e.to_string()))?;

        Ok(normalize(classify(reply)))
    }

    async fn close(&mut self) -> Result<()> {
        self.client = None;
        Ok(())
    }
}

/// Sorts a native reply into one of the normalizer's shapes.
pub(crate) fn classify(reply: RedisValue) -> Reply {
    match reply {
        RedisValue::SimpleString(s) => Reply::Scalar(Value::String(s)),
        RedisValue::BulkString(bytes) => Reply::Scalar(Value::from_bytes(&bytes)),
        RedisValue::Okay => Reply::Scalar(Value::from("OK")),
        RedisValue::Int(i) => Reply::Scalar(Value::Int(i)),
        RedisValue::Array(items) | RedisValue::Set(items) => {
            Reply::List(items.into_iter().map(to_cell).collect())
        }
        RedisValue::Map(entries) => Reply::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (to_cell(k), to_cell(v)))
                .collect(),
        ),
        other => Reply::Other(render(&other)),
    }
}

/// Converts a nested reply element into a cell.
fn to_cell(value: RedisValue) -> Value {
    match value {
        RedisValue::Nil => Value::Null,
        RedisValue::Int(i) => Value::Int(i),
        RedisValue::Double(f) => Value::Float(f),
        RedisValue::Boolean(b) => Value::Bool(b),
        RedisValue::BulkString(bytes) => Value::from_bytes(&bytes),
        RedisValue::SimpleString(s) => Value::String(s),
        RedisValue::Okay => Value::from("OK"),
        other => Value::String(render(&other)),
    }
}

/// Text rendering for replies that have no tabular shape.
fn render(value: &RedisValue) -> String {
    match value {
        RedisValue::Nil => "<nil>".to_string(),
        RedisValue::Double(f) => f.to_string(),
        RedisValue::Boolean(b) => b.to_string(),
        RedisValue::VerbatimString { text, .. } => text.clone(),
        other => format!("{other:?}"),
    }
}
