use poem::http::StatusCode;
use tracing::error;

use crate::domain::errors::DomainError;

/// Maps a use-case error to an HTTP error, looking through `anyhow` for a
/// [`DomainError`].
pub fn map_error(err: anyhow::Error) -> poem::Error {
    match err.downcast_ref::<DomainError>() {
        Some(domain) => map_domain_error(domain),
        None => internal_error(err),
    }
}

pub fn map_domain_error(err: &DomainError) -> poem::Error {
    let status = match err {
        DomainError::EmptyContent
        | DomainError::ContentTooLong
        | DomainError::EmptyDestination
        | DomainError::DestinationTooLong
        | DomainError::InvalidPagination(_)
        | DomainError::MessageNotPending(_)
        | DomainError::SchedulerAlreadyRunning
        | DomainError::SchedulerNotRunning => StatusCode::BAD_REQUEST,
        DomainError::MessageNotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!(error = %err, "request failed");
    }
    poem::Error::from_string(err.to_string(), status)
}

fn internal_error(err: anyhow::Error) -> poem::Error {
    error!(error = %err, "request failed");
    poem::Error::from_string(err.to_string(), StatusCode::INTERNAL_SERVER_ERROR)
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn domain_errors_map_to_client_statuses() {
        let id = Uuid::new_v4();

        assert_eq!(
            map_error(DomainError::ContentTooLong.into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            map_error(DomainError::MessageNotFound(id).into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            map_error(DomainError::MessageNotPending(id).into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            map_domain_error(&DomainError::SchedulerAlreadyRunning).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn other_errors_are_internal() {
        let err = map_error(anyhow::anyhow!("pool timed out"));

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "pool timed out");
    }
}
