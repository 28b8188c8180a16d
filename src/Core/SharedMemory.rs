// Named shared-memory region for Linux
// Backed by a file in /dev/shm and mapped MAP_SHARED, so another process can
// open the same name and write the mailbox.

#[cfg(not(target_os = "linux"))]
use std::io;
use std::ptr::NonNull;

/// Directory that backs POSIX shared memory on Linux.
pub const SHM_DIR: &str = "/dev/shm";

/// A mapped, named shared-memory region.
///
/// The mapping is released and the descriptor closed on drop; the backing
/// file stays until [`SharedRegion::unlink`] removes it.
#[derive(Debug)]
pub struct SharedRegion {
    ptr: NonNull<u8>,
    size: usize,
    fd: i32,
    name: String,
}

unsafe impl Send for SharedRegion {}
unsafe impl Sync for SharedRegion {}

impl SharedRegion {
    /// Name the region was created or attached under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size of the mapped window in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    pub(crate) fn as_non_null(&self) -> NonNull<u8> {
        self.ptr
    }

    pub fn raw_fd(&self) -> i32 {
        self.fd
    }

    /// Path of the backing file for `name`.
    pub fn path_for(name: &str) -> String {
        format!("{}/{}", SHM_DIR, name)
    }
}

#[cfg(target_os = "linux")]
mod linux {
    use super::SharedRegion;
    use std::fs::OpenOptions;
    use std::io;
    use std::os::fd::{AsRawFd, IntoRawFd};
    use std::os::unix::fs::OpenOptionsExt;
    use std::ptr::{self, NonNull};

    /// A region name must be a single entry directly under `/dev/shm`.
    fn check_name(name: &str) -> io::Result<()> {
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\0']) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid shared region name {:?}", name),
            ));
        }
        Ok(())
    }

    impl SharedRegion {
        /// Create (or truncate) the region `name` with `size` zeroed bytes.
        pub fn create(name: &str, size: usize) -> io::Result<Self> {
            if size == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "shared region size must be greater than zero",
                ));
            }
            check_name(name)?;

            let path = Self::path_for(name);
            let file = OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&path)
                .map_err(|e| {
                    io::Error::new(
                        e.kind(),
                        format!("Failed to create shared region at {}: {}", path, e),
                    )
                })?;

            if unsafe { libc::ftruncate(file.as_raw_fd(), size as libc::off_t) } != 0 {
                return Err(io::Error::last_os_error());
            }

            let region = Self::map(file.into_raw_fd(), size, name)?;
            log::info!("created shared region {} ({} bytes)", path, size);
            Ok(region)
        }

        /// Map an existing region `name`, which must hold at least `size` bytes.
        pub fn attach(name: &str, size: usize) -> io::Result<Self> {
            check_name(name)?;
            let path = Self::path_for(name);
            let file = OpenOptions::new()
                .read(true)
                .write(true)
                .open(&path)
                .map_err(|e| {
                    io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("Failed to open shared region at {}: {}", path, e),
                    )
                })?;

            let file_size = file.metadata()?.len() as usize;
            if file_size < size {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "Shared region too small: expected at least {} bytes, got {}",
                        size, file_size
                    ),
                ));
            }

            let region = Self::map(file.into_raw_fd(), file_size, name)?;
            log::info!("attached shared region {} ({} bytes)", path, file_size);
            Ok(region)
        }

        /// Remove the backing file. Existing mappings stay valid.
        pub fn unlink(name: &str) -> io::Result<()> {
            check_name(name)?;
            std::fs::remove_file(Self::path_for(name))
        }

        fn map(fd: i32, size: usize, name: &str) -> io::Result<Self> {
            let ptr = unsafe {
                libc::mmap(
                    ptr::null_mut(),
                    size,
                    libc::PROT_READ | libc::PROT_WRITE,
                    libc::MAP_SHARED,
                    fd,
                    0,
                )
            };

            if ptr == libc::MAP_FAILED {
                let err = io::Error::last_os_error();
                unsafe { libc::close(fd) };
                return Err(err);
            }

            let ptr = NonNull::new(ptr as *mut u8).ok_or_else(|| {
                io::Error::new(io::ErrorKind::Other, "mmap returned a null mapping")
            })?;

            Ok(Self {
                ptr,
                size,
                fd,
                name: name.to_string(),
            })
        }
    }

    impl Drop for SharedRegion {
        fn drop(&mut self) {
            unsafe {
                libc::munmap(self.ptr.as_ptr() as *mut libc::c_void, self.size);
                libc::close(self.fd);
            }
        }
    }
}

#[cfg(not(target_os = "linux"))]
impl SharedRegion {
    pub fn create(_name: &str, _size: usize) -> io::Result<Self> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "Shared regions only supported on Linux",
        ))
    }

    pub fn attach(_name: &str, _size: usize) -> io::Result<Self> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "Shared regions only supported on Linux",
        ))
    }

    pub fn unlink(_name: &str) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "Shared regions only supported on Linux",
        ))
    }
}
