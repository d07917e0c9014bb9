use std::path::PathBuf;
#[cfg(not(feature = "static-link"))]
use std::path::Path;

#[cfg(not(feature = "static-link"))]
use anyhow::Context;
use stampcall_capi_utils::EntryPoint;
#[cfg(not(feature = "static-link"))]
use stampcall_libloader::NativeLibrary;

/// Directory of the native library, fixed at build time.
pub const NATIVE_DIR: &str = env!("STAMPCALL_NATIVE_DIR");

/// Name of the native library, fixed at build time.
pub const NATIVE_LIB: &str = env!("STAMPCALL_NATIVE_LIB");

/// Returns the platform specific path of the native library.
pub fn native_library_path() -> PathBuf {
    stampcall_libloader::library_path(NATIVE_DIR, NATIVE_LIB)
}

#[cfg(feature = "static-link")]
mod linked {
    use std::os::raw::{c_char, c_int};

    extern "C" {
        pub fn foo(message: *const c_char) -> c_int;
    }
}

/// The bound `foo` entry point. When loaded at runtime, the library stays loaded for as long as
/// the binding is alive.
pub struct Binding {
    entry_point: EntryPoint,
    #[cfg(not(feature = "static-link"))]
    _library: NativeLibrary,
}

impl Binding {
    /// Binds the entry point that was linked into the executable.
    #[cfg(feature = "static-link")]
    pub fn bind() -> anyhow::Result<Self> {
        log::debug!("using statically linked '{NATIVE_LIB}'");
        Ok(Binding {
            entry_point: linked::foo,
        })
    }

    /// Loads the native library from [`native_library_path`] and binds its entry point.
    #[cfg(not(feature = "static-link"))]
    pub fn bind() -> anyhow::Result<Self> {
        // SAFETY: the native library is the collaborator the program was configured with at build
        // time and exports `int foo(const char*)`.
        unsafe { Self::load(&native_library_path(), stampcall_capi_utils::ENTRY_POINT_NAME) }
    }

    /// Loads the library at `path` and binds `symbol` as the entry point.
    ///
    /// # Safety
    ///
    /// Loading runs the library's initialisers, see [`NativeLibrary::new`]. `symbol` must have the
    /// signature `int symbol(const char*)` and must not retain its argument.
    #[cfg(not(feature = "static-link"))]
    pub unsafe fn load(path: &Path, symbol: &str) -> anyhow::Result<Self> {
        let library = NativeLibrary::with_symbol(path, symbol)
            .with_context(|| format!("failed to bind '{symbol}'"))?;
        Ok(Binding {
            entry_point: library.entry_point(),
            _library: library,
        })
    }

    pub fn entry_point(&self) -> EntryPoint {
        self.entry_point
    }
}
