// End-to-end tests for the staff training assistant API
//
// Every test starts the real router on an ephemeral port. The Azure services
// behind it are replaced by the in-memory fakes in `helpers::fakes`, so the
// suite runs without network access or credentials.

mod helpers;
mod test_health;
mod test_speech;
