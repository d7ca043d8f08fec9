//! FreeRTOS task notification as the mailbox wake/wait pair.
//!
//! The notification latches, so a wake that lands between the consumer's
//! readiness check and its wait is not lost.

extern crate alloc;

use alloc::sync::Arc;
use core::num::NonZeroU32;

use esp_idf_svc::hal::delay::BLOCK;
use esp_idf_svc::hal::task::notification::{Notification, Notifier};

use crate::console::{Wait, Wake};

/// Consumer side. Must be created on the task that waits.
pub struct TaskWaiter {
    notification: Notification,
}

impl TaskWaiter {
    pub fn new() -> Self {
        Self {
            notification: Notification::new(),
        }
    }

    /// Waker for the receive context.
    pub fn waker(&self) -> TaskWaker {
        TaskWaker(self.notification.notifier())
    }
}

impl Default for TaskWaiter {
    fn default() -> Self {
        Self::new()
    }
}

impl Wait for TaskWaiter {
    fn wait(&mut self) {
        let _ = self.notification.wait(BLOCK);
    }
}

/// Producer side, sendable to the receive task.
#[derive(Clone)]
pub struct TaskWaker(Arc<Notifier>);

impl Wake for TaskWaker {
    fn wake(&self) {
        // SAFETY: The waiting task owns the Notification and lives for the
        // whole firmware run, so the notified task handle stays valid.
        unsafe {
            self.0.notify_and_yield(NonZeroU32::MIN);
        }
    }
}
