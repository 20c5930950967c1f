use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("smart_librarian.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter =
    Counter::new("smart_librarian.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("smart_librarian.client.request_duration_seconds");

pub(crate) static SESSION_QUERIES: Counter = Counter::new("smart_librarian.session.queries");
pub(crate) static SESSION_REJECTED: Counter = Counter::new("smart_librarian.session.rejected");
pub(crate) static SESSION_FALLBACKS: Counter = Counter::new("smart_librarian.session.fallbacks");
pub(crate) static SESSION_FAILURES: Counter = Counter::new("smart_librarian.session.failures");

pub(crate) static PROBE_ONLINE: Counter = Counter::new("smart_librarian.probe.online");
pub(crate) static PROBE_OFFLINE: Counter = Counter::new("smart_librarian.probe.offline");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&SESSION_QUERIES);
    collector.register_counter(&SESSION_REJECTED);
    collector.register_counter(&SESSION_FALLBACKS);
    collector.register_counter(&SESSION_FAILURES);

    collector.register_counter(&PROBE_ONLINE);
    collector.register_counter(&PROBE_OFFLINE);
}
