//! C-compatible FFI for messages and qualified times.
//!
//! These functions expose the value types through opaque boxed handles so a
//! `cdylib` build can be consumed from C or other languages.
//!
//! The API follows a status-code pattern: `0` indicates success, negative
//! numbers indicate errors, and positive numbers are reserved for
//! non-error states such as "indeterminate" or "invalid range".
//!
//! Times cross the boundary as `u64` nanoseconds. Qualifiers cross as
//! integers in declaration order: `0` or-closest-before, `1` closest-before,
//! `2` or-closest-after, `3` closest-after.

use crate::{Message, QualifiedTime, QualifiedTimeRange, Qualifier};
use std::os::raw::{c_char, c_int, c_uchar};
use std::ptr;
use std::time::Duration;

/// Generic success status.
pub const TLOG_OK: c_int = 0;
/// Returned when the provided arguments are null or otherwise invalid.
pub const TLOG_ERR_INVALID_ARGUMENT: c_int = -1;
/// Returned when a time does not fit in `u64` nanoseconds.
pub const TLOG_ERR_OVERFLOW: c_int = -2;
/// Returned by time/qualifier getters when the qualified time is indeterminate.
pub const TLOG_STATUS_INDETERMINATE: c_int = 1;
/// Returned by range setters when the range is invalid after the change.
pub const TLOG_STATUS_INVALID_RANGE: c_int = 2;

/// Opaque qualified time handle.
#[repr(C)]
pub struct TlogQualifiedTime {
    inner: QualifiedTime,
}

/// Opaque qualified time range handle.
#[repr(C)]
pub struct TlogTimeRange {
    inner: QualifiedTimeRange,
}

/// Opaque message handle.
#[repr(C)]
pub struct TlogMessage {
    inner: Message,
}

/// Buffer returned to callers for payload and name data.
#[repr(C)]
pub struct TlogBuffer {
    pub data: *mut c_uchar,
    pub len: usize,
}

fn qualifier_from_raw(raw: c_int) -> Option<Qualifier> {
    usize::try_from(raw)
        .ok()
        .and_then(|i| Qualifier::ALL.get(i).copied())
}

fn qualifier_to_raw(qualifier: Qualifier) -> c_int {
    match qualifier {
        Qualifier::OrClosestBefore => 0,
        Qualifier::ClosestBefore => 1,
        Qualifier::OrClosestAfter => 2,
        Qualifier::ClosestAfter => 3,
    }
}

fn into_buffer(bytes: &[u8]) -> TlogBuffer {
    let mut vec = bytes.to_vec().into_boxed_slice();
    let len = vec.len();
    let data = vec.as_mut_ptr();
    std::mem::forget(vec);
    TlogBuffer { data, len }
}

/// # Safety
/// `buf` must be null (with `len == 0`) or point to at least `len` readable bytes.
unsafe fn slice_arg<'a>(buf: *const c_uchar, len: usize) -> Option<&'a [u8]> {
    if buf.is_null() {
        return (len == 0).then_some(&[][..]);
    }
    Some(unsafe { std::slice::from_raw_parts(buf, len) })
}

/// Create a pinned qualified time. Returns null for an unknown qualifier.
#[unsafe(no_mangle)]
pub extern "C" fn tlog_qualified_time_new(
    time_ns: u64,
    qualifier: c_int,
) -> *mut TlogQualifiedTime {
    match qualifier_from_raw(qualifier) {
        Some(q) => Box::into_raw(Box::new(TlogQualifiedTime {
            inner: QualifiedTime::new(Duration::from_nanos(time_ns), q),
        })),
        None => ptr::null_mut(),
    }
}

/// Create an indeterminate qualified time.
#[unsafe(no_mangle)]
pub extern "C" fn tlog_qualified_time_indeterminate() -> *mut TlogQualifiedTime {
    Box::into_raw(Box::new(TlogQualifiedTime {
        inner: QualifiedTime::indeterminate(),
    }))
}

/// # Safety
/// `handle` must be null or a pointer obtained from a `tlog_qualified_time_*`
/// constructor that has not been freed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tlog_qualified_time_free(handle: *mut TlogQualifiedTime) {
    if !handle.is_null() {
        drop(unsafe { Box::from_raw(handle) });
    }
}

/// Returns `1` if indeterminate, `0` if pinned, negative on a null handle.
///
/// # Safety
/// `handle` must be a valid qualified time handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tlog_qualified_time_is_indeterminate(
    handle: *const TlogQualifiedTime,
) -> c_int {
    match unsafe { handle.as_ref() } {
        Some(h) => c_int::from(h.inner.is_indeterminate()),
        None => TLOG_ERR_INVALID_ARGUMENT,
    }
}

/// # Safety
/// `handle` must be a valid qualified time handle and `time_out` a valid
/// pointer. `time_out` is untouched unless `TLOG_OK` is returned.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tlog_qualified_time_get_time(
    handle: *const TlogQualifiedTime,
    time_out: *mut u64,
) -> c_int {
    let Some(h) = (unsafe { handle.as_ref() }) else {
        return TLOG_ERR_INVALID_ARGUMENT;
    };
    if time_out.is_null() {
        return TLOG_ERR_INVALID_ARGUMENT;
    }

    match h.inner.time() {
        Some(time) => match u64::try_from(time.as_nanos()) {
            Ok(nanos) => {
                unsafe { *time_out = nanos };
                TLOG_OK
            }
            Err(_) => TLOG_ERR_OVERFLOW,
        },
        None => TLOG_STATUS_INDETERMINATE,
    }
}

/// # Safety
/// `handle` must be a valid qualified time handle and `qualifier_out` a valid
/// pointer. `qualifier_out` is untouched unless `TLOG_OK` is returned.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tlog_qualified_time_get_qualifier(
    handle: *const TlogQualifiedTime,
    qualifier_out: *mut c_int,
) -> c_int {
    let Some(h) = (unsafe { handle.as_ref() }) else {
        return TLOG_ERR_INVALID_ARGUMENT;
    };
    if qualifier_out.is_null() {
        return TLOG_ERR_INVALID_ARGUMENT;
    }

    match h.inner.qualifier() {
        Some(q) => {
            unsafe { *qualifier_out = qualifier_to_raw(q) };
            TLOG_OK
        }
        None => TLOG_STATUS_INDETERMINATE,
    }
}

/// # Safety
/// `handle` must be a valid qualified time handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tlog_qualified_time_set_time(
    handle: *mut TlogQualifiedTime,
    time_ns: u64,
    qualifier: c_int,
) -> c_int {
    let (Some(h), Some(q)) = (unsafe { handle.as_mut() }, qualifier_from_raw(qualifier)) else {
        return TLOG_ERR_INVALID_ARGUMENT;
    };
    h.inner.set_time(Duration::from_nanos(time_ns), q);
    TLOG_OK
}

/// # Safety
/// `handle` must be a valid qualified time handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tlog_qualified_time_clear(handle: *mut TlogQualifiedTime) -> c_int {
    match unsafe { handle.as_mut() } {
        Some(h) => {
            h.inner.clear();
            TLOG_OK
        }
        None => TLOG_ERR_INVALID_ARGUMENT,
    }
}

unsafe fn qualified_time_arg(handle: *const TlogQualifiedTime) -> QualifiedTime {
    unsafe { handle.as_ref() }
        .map(|h| h.inner)
        .unwrap_or_default()
}

/// Create a range. A null endpoint is treated as indeterminate; the
/// endpoints are copied, so the caller keeps ownership of its handles.
///
/// # Safety
/// `start` and `finish` must each be null or a valid qualified time handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tlog_range_new(
    start: *const TlogQualifiedTime,
    finish: *const TlogQualifiedTime,
) -> *mut TlogTimeRange {
    let range = unsafe {
        QualifiedTimeRange::new(qualified_time_arg(start), qualified_time_arg(finish))
    };
    Box::into_raw(Box::new(TlogTimeRange { inner: range }))
}

/// # Safety
/// `handle` must be null or a pointer obtained from `tlog_range_new` that has
/// not been freed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tlog_range_free(handle: *mut TlogTimeRange) {
    if !handle.is_null() {
        drop(unsafe { Box::from_raw(handle) });
    }
}

fn validity_status(valid: bool) -> c_int {
    if valid { TLOG_OK } else { TLOG_STATUS_INVALID_RANGE }
}

/// Replace the start. The value is applied even when
/// `TLOG_STATUS_INVALID_RANGE` is returned.
///
/// # Safety
/// `handle` must be a valid range handle; `start` null or a valid qualified time handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tlog_range_set_start(
    handle: *mut TlogTimeRange,
    start: *const TlogQualifiedTime,
) -> c_int {
    match unsafe { handle.as_mut() } {
        Some(h) => validity_status(h.inner.set_start(unsafe { qualified_time_arg(start) })),
        None => TLOG_ERR_INVALID_ARGUMENT,
    }
}

/// Replace the finish. The value is applied even when
/// `TLOG_STATUS_INVALID_RANGE` is returned.
///
/// # Safety
/// `handle` must be a valid range handle; `finish` null or a valid qualified time handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tlog_range_set_finish(
    handle: *mut TlogTimeRange,
    finish: *const TlogQualifiedTime,
) -> c_int {
    match unsafe { handle.as_mut() } {
        Some(h) => validity_status(h.inner.set_finish(unsafe { qualified_time_arg(finish) })),
        None => TLOG_ERR_INVALID_ARGUMENT,
    }
}

/// Replace both edges. The values are applied even when
/// `TLOG_STATUS_INVALID_RANGE` is returned.
///
/// # Safety
/// `handle` must be a valid range handle; `start` and `finish` null or valid
/// qualified time handles.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tlog_range_set_range(
    handle: *mut TlogTimeRange,
    start: *const TlogQualifiedTime,
    finish: *const TlogQualifiedTime,
) -> c_int {
    match unsafe { handle.as_mut() } {
        Some(h) => validity_status(unsafe {
            h.inner
                .set_range(qualified_time_arg(start), qualified_time_arg(finish))
        }),
        None => TLOG_ERR_INVALID_ARGUMENT,
    }
}

/// Returns `TLOG_OK` for a valid range, `TLOG_STATUS_INVALID_RANGE` otherwise.
///
/// # Safety
/// `handle` must be a valid range handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tlog_range_valid(handle: *const TlogTimeRange) -> c_int {
    match unsafe { handle.as_ref() } {
        Some(h) => validity_status(h.inner.is_valid()),
        None => TLOG_ERR_INVALID_ARGUMENT,
    }
}

/// Copy one edge of a range into a new qualified time handle. `which` is
/// `0` for start and `1` for finish; any other value returns null.
///
/// # Safety
/// `handle` must be a valid range handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tlog_range_get_edge(
    handle: *const TlogTimeRange,
    which: c_int,
) -> *mut TlogQualifiedTime {
    let Some(h) = (unsafe { handle.as_ref() }) else {
        return ptr::null_mut();
    };
    let edge = match which {
        0 => *h.inner.start(),
        1 => *h.inner.finish(),
        _ => return ptr::null_mut(),
    };
    Box::into_raw(Box::new(TlogQualifiedTime { inner: edge }))
}

/// Create a message from explicit-length buffers. The buffers are copied and
/// may be reused as soon as this returns. Names need not be null-terminated;
/// invalid UTF-8 sequences in them are replaced.
///
/// # Safety
/// Each pointer must be null with a zero length, or point to at least the
/// given number of readable bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tlog_message_new(
    time_ns: u64,
    data: *const c_uchar,
    data_len: usize,
    message_type: *const c_char,
    type_len: usize,
    topic: *const c_char,
    topic_len: usize,
) -> *mut TlogMessage {
    let parts = unsafe {
        (
            slice_arg(data, data_len),
            slice_arg(message_type.cast(), type_len),
            slice_arg(topic.cast(), topic_len),
        )
    };
    let (Some(data), Some(message_type), Some(topic)) = parts else {
        return ptr::null_mut();
    };

    let message = Message::new(
        Duration::from_nanos(time_ns),
        data,
        String::from_utf8_lossy(message_type),
        String::from_utf8_lossy(topic),
    );
    Box::into_raw(Box::new(TlogMessage { inner: message }))
}

/// # Safety
/// `handle` must be null or a pointer obtained from `tlog_message_new` that
/// has not been freed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tlog_message_free(handle: *mut TlogMessage) {
    if !handle.is_null() {
        drop(unsafe { Box::from_raw(handle) });
    }
}

unsafe fn message_field(
    handle: *const TlogMessage,
    out_buffer: *mut TlogBuffer,
    field: impl FnOnce(&Message) -> &[u8],
) -> c_int {
    let Some(h) = (unsafe { handle.as_ref() }) else {
        return TLOG_ERR_INVALID_ARGUMENT;
    };
    if out_buffer.is_null() {
        return TLOG_ERR_INVALID_ARGUMENT;
    }
    unsafe { *out_buffer = into_buffer(field(&h.inner)) };
    TLOG_OK
}

/// Copy the payload into `out_buffer`; release it with `tlog_buffer_free`.
///
/// # Safety
/// `handle` must be a valid message handle and `out_buffer` a valid pointer.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tlog_message_data(
    handle: *const TlogMessage,
    out_buffer: *mut TlogBuffer,
) -> c_int {
    unsafe { message_field(handle, out_buffer, Message::data) }
}

/// Copy the type name (not null-terminated) into `out_buffer`.
///
/// # Safety
/// `handle` must be a valid message handle and `out_buffer` a valid pointer.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tlog_message_type(
    handle: *const TlogMessage,
    out_buffer: *mut TlogBuffer,
) -> c_int {
    unsafe { message_field(handle, out_buffer, |m| m.message_type().as_bytes()) }
}

/// Copy the topic name (not null-terminated) into `out_buffer`.
///
/// # Safety
/// `handle` must be a valid message handle and `out_buffer` a valid pointer.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tlog_message_topic(
    handle: *const TlogMessage,
    out_buffer: *mut TlogBuffer,
) -> c_int {
    unsafe { message_field(handle, out_buffer, |m| m.topic().as_bytes()) }
}

/// # Safety
/// `handle` must be a valid message handle and `time_out` a valid pointer.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tlog_message_time_received(
    handle: *const TlogMessage,
    time_out: *mut u64,
) -> c_int {
    let Some(h) = (unsafe { handle.as_ref() }) else {
        return TLOG_ERR_INVALID_ARGUMENT;
    };
    if time_out.is_null() {
        return TLOG_ERR_INVALID_ARGUMENT;
    }
    match u64::try_from(h.inner.time_received().as_nanos()) {
        Ok(nanos) => {
            unsafe { *time_out = nanos };
            TLOG_OK
        }
        Err(_) => TLOG_ERR_OVERFLOW,
    }
}

/// # Safety
/// `buffer` must be a value previously produced by this module and not yet
/// freed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn tlog_buffer_free(buffer: TlogBuffer) {
    if buffer.data.is_null() {
        return;
    }
    let slice = ptr::slice_from_raw_parts_mut(buffer.data, buffer.len);
    drop(unsafe { Box::from_raw(slice) });
}
