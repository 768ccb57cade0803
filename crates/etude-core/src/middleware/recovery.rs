//! Panic recovery stage.
//!
//! [`recovery`] is the one place a panic inside the pipeline is caught. The
//! panic message and the backtrace captured at the panic site are logged,
//! whatever was written to the response is discarded, and the request is
//! answered with a 500 through [`Context::fail`]. Stages upstream of
//! recovery still see their `next` return normally.
//!
//! Side effects a stage produced outside the response are not rolled back.

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use http::StatusCode;

use crate::context::{handler, Context, HandlerFunc};
use crate::error::EtudeError;

thread_local! {
    static LAST_PANIC: RefCell<Option<String>> = const { RefCell::new(None) };
    /// Recovery stages currently on this thread's stack.
    static GUARD_DEPTH: Cell<usize> = const { Cell::new(0) };
}

static INSTALL_HOOK: Once = Once::new();

fn guarded() -> bool {
    GUARD_DEPTH.with(Cell::get) > 0
}

/// Marks the current thread as running under a recovery stage until dropped.
struct Guard;

impl Guard {
    fn enter() -> Self {
        GUARD_DEPTH.with(|d| d.set(d.get() + 1));
        Guard
    }
}

impl Drop for Guard {
    fn drop(&mut self) {
        GUARD_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

/// Under a recovery stage, record the panic location and a backtrace before
/// the stack unwinds; the stage reports it through `tracing`. Any other
/// panic goes to whatever hook was installed before.
fn install_trace_hook() {
    INSTALL_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !guarded() {
                previous(info);
                return;
            }
            let location = info
                .location()
                .map(|l| format!("{}:{}", l.file(), l.line()))
                .unwrap_or_else(|| "<unknown>".to_string());
            let trace = format!("at {location}\n{}", Backtrace::force_capture());
            LAST_PANIC.with(|slot| *slot.borrow_mut() = Some(trace));
        }));
    });
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Catch panics from every stage after this one.
pub fn recovery() -> HandlerFunc {
    install_trace_hook();

    handler(|c: &mut Context| {
        let outcome = {
            let _guard = Guard::enter();
            panic::catch_unwind(AssertUnwindSafe(|| c.next()))
        };
        if let Err(payload) = outcome {
            let err = EtudeError::HandlerPanic(panic_message(payload.as_ref()));
            let trace = LAST_PANIC
                .with(|slot| slot.borrow_mut().take())
                .unwrap_or_else(|| "<no backtrace captured>".to_string());
            tracing::error!(
                method = %c.method(),
                path = %c.path(),
                "{err}\nTraceback:\n{trace}"
            );
            c.reset_response();
            c.fail(err.status_code(), "Internal Server Error");
        }
    })
}
