//! Framework de testes do kernel
//!
//! Suites executadas no próprio kernel (feature `self_test`), sem depender
//! do harness de testes do host.

/// Resultado de teste
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TestResult {
    Passed,
    Failed,
    Skipped,
}

/// Um caso de teste
pub struct TestCase {
    pub name: &'static str,
    pub func: fn() -> TestResult,
}

impl TestCase {
    pub const fn new(name: &'static str, func: fn() -> TestResult) -> Self {
        Self { name, func }
    }
}

/// Executa suite de testes. Retorna (passed, failed, skipped).
pub fn run_test_suite(name: &str, tests: &[TestCase]) -> (usize, usize, usize) {
    crate::klog!("=== Executando suite: ");
    crate::klog!(name);
    crate::knl!();

    let mut passed = 0;
    let mut failed = 0;
    let mut skipped = 0;

    for test in tests {
        let result = (test.func)();
        match result {
            TestResult::Passed => {
                crate::kok!(test.name);
                passed += 1;
            }
            TestResult::Failed => {
                crate::kfail!(test.name);
                failed += 1;
            }
            TestResult::Skipped => {
                crate::kwarn!("[SKIP]");
                skipped += 1;
            }
        }
    }

    crate::klog!("Resultados: passed=", passed, " failed=", failed);
    crate::knl!();
    (passed, failed, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok() -> TestResult {
        TestResult::Passed
    }

    fn bad() -> TestResult {
        TestResult::Failed
    }

    fn skip() -> TestResult {
        TestResult::Skipped
    }

    #[test]
    fn test_suite_counts_results() {
        let suite = [
            TestCase::new("ok", ok),
            TestCase::new("ok2", ok),
            TestCase::new("bad", bad),
            TestCase::new("skip", skip),
        ];
        assert_eq!(run_test_suite("framework", &suite), (2, 1, 1));
    }
}
