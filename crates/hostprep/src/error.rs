use std::fmt;
use std::process::ExitStatus;

/// An external command exited non-zero. Carries the code so `main` can
/// propagate it as the process's own exit status.
#[derive(Debug)]
pub(crate) struct StepError {
    pub(crate) step: &'static str,
    pub(crate) code: i32,
}

impl StepError {
    pub(crate) fn new(step: &'static str, code: i32) -> Self {
        Self { step, code }
    }
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed with exit code {}", self.step, self.code)
    }
}

impl std::error::Error for StepError {}

/// Exit code of a finished child; -1 when it was killed by a signal.
pub(crate) fn status_code(status: &ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carries_step_and_code_through_anyhow() {
        let err: anyhow::Error = StepError::new("run_bootstrap_playbook", 2).into();
        let step = err.downcast_ref::<StepError>().unwrap();
        assert_eq!(step.step, "run_bootstrap_playbook");
        assert_eq!(step.code, 2);
        assert_eq!(
            err.to_string(),
            "run_bootstrap_playbook failed with exit code 2"
        );
    }
}
