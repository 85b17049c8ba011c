use contracts::shared::ApiErrorDetail;

/// State of one asynchronous fetch.
///
/// A fetch goes `NotAsked -> Loading -> Success | Failure`; a new fetch
/// replaces the value with a fresh `Loading` (or `NotAsked` when a cache is
/// invalidated). No transition logic lives here, callers replace the value.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteData<T, E = Vec<ApiErrorDetail>> {
    NotAsked,
    Loading,
    Success(T),
    Failure(E),
}

impl<T, E> Default for RemoteData<T, E> {
    fn default() -> Self {
        RemoteData::NotAsked
    }
}

impl<T, E> RemoteData<T, E> {
    pub fn is_not_asked(&self) -> bool {
        matches!(self, RemoteData::NotAsked)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RemoteData::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RemoteData::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, RemoteData::Failure(_))
    }

    pub fn payload(&self) -> Option<&T> {
        match self {
            RemoteData::Success(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn into_payload(self) -> Option<T> {
        match self {
            RemoteData::Success(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn errors(&self) -> Option<&E> {
        match self {
            RemoteData::Failure(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> RemoteData<&T, &E> {
        match self {
            RemoteData::NotAsked => RemoteData::NotAsked,
            RemoteData::Loading => RemoteData::Loading,
            RemoteData::Success(payload) => RemoteData::Success(payload),
            RemoteData::Failure(errors) => RemoteData::Failure(errors),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RemoteData<U, E> {
        match self {
            RemoteData::NotAsked => RemoteData::NotAsked,
            RemoteData::Loading => RemoteData::Loading,
            RemoteData::Success(payload) => RemoteData::Success(f(payload)),
            RemoteData::Failure(errors) => RemoteData::Failure(errors),
        }
    }

    /// Exhaustive case analysis by reference, every state needs a handler
    pub fn match_with<R>(
        &self,
        not_asked: impl FnOnce() -> R,
        loading: impl FnOnce() -> R,
        success: impl FnOnce(&T) -> R,
        failure: impl FnOnce(&E) -> R,
    ) -> R {
        match self {
            RemoteData::NotAsked => not_asked(),
            RemoteData::Loading => loading(),
            RemoteData::Success(payload) => success(payload),
            RemoteData::Failure(errors) => failure(errors),
        }
    }

    /// Side effect on the resolved states only, pending states are ignored
    pub fn apply(&self, on_success: impl FnOnce(&T), on_failure: impl FnOnce(&E)) {
        match self {
            RemoteData::Success(payload) => on_success(payload),
            RemoteData::Failure(errors) => on_failure(errors),
            RemoteData::NotAsked | RemoteData::Loading => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        let data: RemoteData<Vec<i32>> = RemoteData::NotAsked;
        assert!(data.is_not_asked());
        assert!(!data.is_success());

        let data: RemoteData<Vec<i32>> = RemoteData::Success(vec![1]);
        assert!(data.is_success());
        assert_eq!(data.payload(), Some(&vec![1]));
        assert_eq!(data.errors(), None);
    }

    #[test]
    fn test_match_with_returns_handler_value() {
        let data: RemoteData<u32> =
            RemoteData::Failure(vec![ApiErrorDetail::new("Not found", "Run 3 not found")]);

        let label = data.match_with(
            || "idle".to_string(),
            || "loading".to_string(),
            |value| value.to_string(),
            |errors| errors[0].detail.clone(),
        );
        assert_eq!(label, "Run 3 not found");
    }

    #[test]
    fn test_apply_skips_pending_states() {
        let calls = std::cell::Cell::new(0);
        RemoteData::<u32>::Loading.apply(|_| calls.set(calls.get() + 1), |_| calls.set(calls.get() + 1));
        assert_eq!(calls.get(), 0);

        RemoteData::<u32>::Success(4).apply(|value| calls.set(calls.get() + *value), |_| {});
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn test_map_keeps_state() {
        let data: RemoteData<Vec<u32>> = RemoteData::Success(vec![1, 2, 3]);
        assert_eq!(data.map(|items| items.len()), RemoteData::Success(3));
        assert_eq!(
            RemoteData::<Vec<u32>>::Loading.map(|items| items.len()),
            RemoteData::Loading
        );
    }
}
