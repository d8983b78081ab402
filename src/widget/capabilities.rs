use std::sync::{Arc, RwLock};

/// Produces ids for new transcript entries.
pub trait IdGenerator: Send {
    fn next_id(&mut self) -> String;
}

/// Random v4 UUIDs.
#[derive(Debug, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// `msg-1`, `msg-2`, ... Deterministic, for tests and one-shot runs.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: u64,
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        self.next += 1;
        format!("msg-{}", self.next)
    }
}

/// Reports the page the user is currently looking at.
pub trait CurrentPathProvider: Send + Sync {
    fn current_path(&self) -> String;
}

/// The app's current route. Cloning shares the same location, so the
/// widget sees navigations made elsewhere in the app.
#[derive(Debug, Clone)]
pub struct Route {
    path: Arc<RwLock<String>>,
}

impl Route {
    pub fn new(start: impl Into<String>) -> Self {
        Self {
            path: Arc::new(RwLock::new(start.into())),
        }
    }

    pub fn navigate(&self, href: &str) {
        let mut path = match self.path.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *path = href.to_string();
    }
}

impl CurrentPathProvider for Route {
    fn current_path(&self) -> String {
        match self.path.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

/// A path that never changes.
#[derive(Debug, Clone)]
pub struct FixedPath(pub String);

impl CurrentPathProvider for FixedPath {
    fn current_path(&self) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_count_up() {
        let mut ids = SequentialIds::default();
        assert_eq!(ids.next_id(), "msg-1");
        assert_eq!(ids.next_id(), "msg-2");
    }

    #[test]
    fn uuid_ids_are_unique() {
        let mut ids = UuidIds;
        assert_ne!(ids.next_id(), ids.next_id());
    }

    #[test]
    fn route_clones_share_location() {
        let route = Route::new("/");
        let seen_by_widget = route.clone();
        route.navigate("/schedule#appointment");
        assert_eq!(seen_by_widget.current_path(), "/schedule#appointment");
    }
}
