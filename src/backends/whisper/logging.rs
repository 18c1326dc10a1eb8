use std::ffi::CStr;
use std::os::raw::{c_char, c_void};
use std::sync::Once;

/// Target used for everything whisper.cpp reports.
const WHISPER_LOG_TARGET: &str = "framescribe::whisper_cpp";

/// Routes whisper.cpp's chatter into `tracing` at `trace` level.
///
/// The JSON logger runs at `warn` by default, so model loading stays quiet unless
/// `FRAMESCRIBE_LOG` asks for it (e.g. `framescribe::whisper_cpp=trace`).
unsafe extern "C" fn forward_whisper_log(level: u32, c_msg: *const c_char, _user_data: *mut c_void) {
    if c_msg.is_null() {
        return;
    }
    // SAFETY: whisper.cpp hands us a NUL-terminated string valid for the duration of the call.
    let msg = unsafe { CStr::from_ptr(c_msg) }.to_string_lossy();
    let msg = msg.trim_end();
    if !msg.is_empty() {
        tracing::trace!(target: WHISPER_LOG_TARGET, ggml_level = level, "{msg}");
    }
}

/// Install the whisper.cpp log hook. Only the first call in a process does anything.
pub(crate) fn init_whisper_logging() {
    static INIT: Once = Once::new();

    INIT.call_once(|| unsafe {
        whisper_rs::set_log_callback(Some(forward_whisper_log), std::ptr::null_mut());
    });
}
