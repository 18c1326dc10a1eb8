use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::{Error, Result};

/// Shared "the user asked us to stop" flag.
///
/// The pipeline checks it between steps and after every blocking external call, turning a
/// pending interrupt into [`Error::Interrupted`] instead of carrying on.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub fn check(&self) -> Result<()> {
        if self.is_triggered() {
            Err(Error::Interrupted)
        } else {
            Ok(())
        }
    }

    /// Install a process-wide Ctrl-C handler that triggers this flag.
    ///
    /// Can only succeed once per process.
    #[cfg(feature = "cli")]
    pub fn install_ctrlc_handler(&self) -> std::result::Result<(), ctrlc::Error> {
        let flag = Arc::clone(&self.flag);
        ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);
            tracing::warn!("interrupt received, stopping after the current step");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn clones_share_the_flag() {
        let interrupt = Interrupt::new();
        let other = interrupt.clone();
        assert!(interrupt.check().is_ok());

        other.trigger();
        assert!(interrupt.is_triggered());
        assert_eq!(interrupt.check().unwrap_err().kind(), ErrorKind::Interrupted);
    }
}
