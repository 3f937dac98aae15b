//! Client reads that resolve later.
//!
//! Every read gets its own [`RequestId`]. The client answers with the same id,
//! possibly out of issue order, and the answer is routed to the handler that
//! was registered for it. A read that is never answered simply stays pending;
//! there is no timeout at this layer.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Result, ZoomistError};

/// Correlates an outbound read with its inbound result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Point-in-time container geometry as reported by the client.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSnapshot {
    pub width: f64,
    pub height: f64,
    pub aspect_ratio: f64,
}

impl ContainerSnapshot {
    /// Decode `{width, height, aspectRatio}`. Each field comes from its own key.
    pub fn from_value(value: &Value) -> Result<Self> {
        let snapshot = Self::deserialize(value).map_err(|e| ZoomistError::malformed("container data", e))?;
        for (name, v) in [
            ("width", snapshot.width),
            ("height", snapshot.height),
            ("aspectRatio", snapshot.aspect_ratio),
        ] {
            if v.is_nan() || v < 0.0 {
                return Err(ZoomistError::malformed(
                    "container data",
                    serde::de::Error::custom(format!("{name} must be a non-negative number, got {v}")),
                ));
            }
        }
        Ok(snapshot)
    }
}

/// Handler run once with the client's raw answer
pub type ReadHandler = Box<dyn FnOnce(&Value) -> Result<()> + Send>;

/// In-flight reads of one widget.
pub struct PendingReads {
    next_id: AtomicU64,
    pending: Mutex<HashMap<RequestId, ReadHandler>>,
}

impl Default for PendingReads {
    fn default() -> Self {
        Self::new()
    }
}

impl PendingReads {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Park `handler` under a fresh id
    pub fn register(&self, handler: ReadHandler) -> RequestId {
        let id = RequestId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, handler);
        id
    }

    /// Forget a read without running its handler
    pub fn cancel(&self, id: RequestId) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id)
            .is_some()
    }

    /// Run the handler registered for `id` with the client's answer.
    ///
    /// Returns Ok(false) when nothing is waiting on `id` (already resolved, or
    /// never issued). The handler runs without the registry lock held, so it
    /// may issue further reads.
    pub fn resolve(&self, id: RequestId, value: &Value) -> Result<bool> {
        let handler = self
            .pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id);
        match handler {
            Some(handler) => handler(value).map(|_| true),
            None => Ok(false),
        }
    }

    pub fn len(&self) -> usize {
        self.pending.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for PendingReads {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingReads").field("pending", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_aspect_ratio_from_its_own_field() {
        let s = ContainerSnapshot::from_value(&json!({"width": 200, "height": 100, "aspectRatio": 2.0})).unwrap();
        assert_eq!(s.width, 200.0);
        assert_eq!(s.height, 100.0);
        assert_eq!(s.aspect_ratio, 2.0);
    }

    #[test]
    fn test_bad_container_data() {
        assert!(ContainerSnapshot::from_value(&json!({"width": 1, "height": 1})).is_err());
        assert!(ContainerSnapshot::from_value(&json!({"width": -1, "height": 1, "aspectRatio": 1})).is_err());
        assert!(ContainerSnapshot::from_value(&json!("nope")).is_err());
    }

    #[test]
    fn test_resolve_routes_by_id() {
        let reads = PendingReads::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let s = Arc::clone(&seen);
        let a = reads.register(Box::new(move |v: &Value| -> Result<()> {
            s.lock().unwrap().push(("a", v.clone()));
            Ok(())
        }));
        let s = Arc::clone(&seen);
        let b = reads.register(Box::new(move |v: &Value| -> Result<()> {
            s.lock().unwrap().push(("b", v.clone()));
            Ok(())
        }));
        assert_ne!(a, b);
        assert_eq!(reads.len(), 2);

        // Answers arrive out of order
        assert!(reads.resolve(b, &json!(2)).unwrap());
        assert!(reads.resolve(a, &json!(1)).unwrap());
        assert_eq!(*seen.lock().unwrap(), vec![("b", json!(2)), ("a", json!(1))]);
        assert!(reads.is_empty());
    }

    #[test]
    fn test_resolve_once() {
        let reads = PendingReads::new();
        let id = reads.register(Box::new(|_: &Value| -> Result<()> { Ok(()) }));
        assert!(reads.resolve(id, &json!(null)).unwrap());
        assert!(!reads.resolve(id, &json!(null)).unwrap());
        assert!(!reads.resolve(RequestId(999), &json!(null)).unwrap());
    }

    #[test]
    fn test_cancel() {
        let reads = PendingReads::new();
        let id = reads.register(Box::new(|_: &Value| -> Result<()> {
            panic!("cancelled read must not run")
        }));
        assert!(reads.cancel(id));
        assert!(!reads.resolve(id, &json!(1)).unwrap());
    }
}
