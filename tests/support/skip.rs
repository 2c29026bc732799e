//! Skip macros for tests that need a real cluster.

/// Skip a test unless a kind cluster is available for it.
///
/// Set `KUBIFY_TEST_CLUSTER` to the name of a running kind cluster.
#[macro_export]
macro_rules! skip_without_cluster {
    () => {
        if std::env::var("KUBIFY_TEST_CLUSTER").is_err() {
            eprintln!("SKIPPED: KUBIFY_TEST_CLUSTER not set");
            return;
        }
        for tool in ["docker", "kind", "kubectl"] {
            if which::which(tool).is_err() {
                eprintln!("SKIPPED: {tool} not on PATH");
                return;
            }
        }
    };
}
