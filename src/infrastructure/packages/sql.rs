use crate::application::{ApplicationResult, error::ApplicationError, ports::sql::SqlScriptRunner};
use async_trait::async_trait;
use sqlx::SqlitePool;

/// Runs package SQL dumps against the project database.
#[derive(Clone)]
pub struct SqliteScriptRunner {
    pool: SqlitePool,
}

impl SqliteScriptRunner {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Splits a dump into statements on `;`, ignoring separators inside quotes
/// and `--` line comments.
pub fn split_statements(script: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = script.chars().peekable();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) => {
                current.push(c);
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' | '`' => {
                    quote = Some(c);
                    current.push(c);
                }
                '-' if chars.peek() == Some(&'-') => {
                    for skipped in chars.by_ref() {
                        if skipped == '\n' {
                            current.push('\n');
                            break;
                        }
                    }
                }
                ';' => {
                    let statement = current.trim();
                    if !statement.is_empty() {
                        statements.push(statement.to_string());
                    }
                    current.clear();
                }
                _ => current.push(c),
            },
        }
    }
    let tail = current.trim();
    if !tail.is_empty() {
        statements.push(tail.to_string());
    }
    statements
}

#[async_trait]
impl SqlScriptRunner for SqliteScriptRunner {
    async fn run_script(&self, script: &str) -> ApplicationResult<usize> {
        let statements = split_statements(script);
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        for (idx, statement) in statements.iter().enumerate() {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(|err| {
                    ApplicationError::infrastructure(format!("statement {} failed: {err}", idx + 1))
                })?;
        }
        tx.commit()
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        Ok(statements.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_unquoted_semicolons() {
        let script = "-- gallery tables\nCREATE TABLE g (id INTEGER);\n\
                      INSERT INTO g VALUES (1); INSERT INTO t VALUES ('a;b');\n";
        assert_eq!(
            split_statements(script),
            vec![
                "CREATE TABLE g (id INTEGER)",
                "INSERT INTO g VALUES (1)",
                "INSERT INTO t VALUES ('a;b')",
            ]
        );
    }

    #[test]
    fn empty_dump_has_no_statements() {
        assert!(split_statements("  -- nothing here\n ; ").is_empty());
    }
}
