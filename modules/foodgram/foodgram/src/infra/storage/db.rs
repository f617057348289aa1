use sea_orm::DbErr;

use crate::domain::error::DomainError;

/// Map a driver error into the domain error space.
pub(crate) fn db_err(err: &DbErr) -> DomainError {
    DomainError::database(err.to_string())
}

/// Escape `LIKE` wildcards so user input only matches literally.
pub(crate) fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_errors_become_database_errors() {
        let err = db_err(&DbErr::Custom("connection reset".to_owned()));
        assert!(matches!(
            err,
            DomainError::Database { ref message } if message.contains("connection reset")
        ));
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("salt"), "salt");
    }
}
