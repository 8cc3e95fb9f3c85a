mod backend_reconciler;
mod service_locator;

pub use backend_reconciler::BackendReconciler;
pub use service_locator::ServiceLocator;
