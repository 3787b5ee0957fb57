//! Non-blocking standard input probe
//!
//! Hooks such as `pre-push` receive data on stdin, but a check run by hand
//! usually has a terminal there. The probe reads whatever is available right
//! now and never waits.

use hooky_core::{Error, Result};

/// Read everything immediately available on stdin
///
/// Returns `None` when nothing is ready, and the bytes read (possibly empty,
/// meaning the stream is closed) otherwise. A stdin that cannot be polled is
/// an error unless `ignore_missing` is set, in which case it reads as `None`.
pub fn probe_stdin(ignore_missing: bool) -> Result<Option<Vec<u8>>> {
    tolerate(probe(), ignore_missing)
}

fn tolerate(probed: Result<Option<Vec<u8>>>, ignore_missing: bool) -> Result<Option<Vec<u8>>> {
    match probed {
        Ok(data) => Ok(data),
        Err(e) if ignore_missing => {
            tracing::debug!(error = %e, "Ignoring unavailable stdin");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn probe() -> Result<Option<Vec<u8>>> {
    let data = read_available(&mut std::io::stdin().lock())?;
    tracing::debug!(bytes = data.as_ref().map(Vec::len), "Probed stdin");
    Ok(data)
}

/// Read from `reader` for as long as it is ready without blocking
#[cfg(unix)]
fn read_available<R>(reader: &mut R) -> Result<Option<Vec<u8>>>
where
    R: rustix::fd::AsFd + std::io::Read,
{
    let mut data: Option<Vec<u8>> = None;
    let mut chunk = [0u8; 8192];

    while ready(&*reader)? {
        let n = reader.read(&mut chunk)?;
        let buf = data.get_or_insert_with(Vec::new);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Ok(data)
}

/// Zero-timeout readiness check
#[cfg(unix)]
fn ready(fd: &impl rustix::fd::AsFd) -> Result<bool> {
    use rustix::event::{PollFd, PollFlags, Timespec, poll};

    let mut fds = [PollFd::new(fd, PollFlags::IN)];
    let zero = Timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    let count = poll(&mut fds, Some(&zero))
        .map_err(|e| Error::StdinUnavailable(format!("poll failed: {e}")))?;

    readiness(count, fds[0].revents())
}

/// Interpret one poll result
#[cfg(unix)]
fn readiness(count: usize, revents: rustix::event::PollFlags) -> Result<bool> {
    use rustix::event::PollFlags;

    if revents.contains(PollFlags::NVAL) {
        return Err(Error::StdinUnavailable(
            "standard input is not open".to_string(),
        ));
    }

    Ok(count > 0 && revents.intersects(PollFlags::IN | PollFlags::HUP | PollFlags::ERR))
}

#[cfg(not(unix))]
fn probe() -> Result<Option<Vec<u8>>> {
    Err(Error::StdinUnavailable(
        "standard input cannot be polled on this platform".to_string(),
    ))
}
