use std::{
    ffi::OsStr,
    io,
    path::{Path, PathBuf},
};

use libloading::Library;
use stampcall_capi_utils::{EntryPoint, ENTRY_POINT_NAME};

/// An error that occurs upon construction of a [`NativeLibrary`].
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("Failed to load shared library '{path}': {source}")]
    LoadLibrary {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },
    #[error("Shared library '{path}' does not export '{symbol}': {source}")]
    MissingSymbol {
        path: PathBuf,
        symbol: String,
        #[source]
        source: libloading::Error,
    },
    #[error("Shared library '{0}' does not exist")]
    NotFound(PathBuf, #[source] io::Error),
}

/// A loaded native library together with the entry point resolved from it.
///
/// The entry point is a plain function pointer that carries no lifetime. It is only valid while
/// the library is loaded; callers must keep the `NativeLibrary` alive for as long as they call it.
pub struct NativeLibrary {
    path: PathBuf,
    entry_point: EntryPoint,
    library: Library,
}

/// Returns the path of the library called `name` inside `dir`, using the platform's naming
/// convention (`libfoo.so`, `libfoo.dylib`, `foo.dll`).
pub fn library_path(dir: impl AsRef<Path>, name: impl AsRef<OsStr>) -> PathBuf {
    dir.as_ref().join(libloading::library_filename(name))
}

impl NativeLibrary {
    /// Loads the library at `path` and resolves the `foo` entry point.
    ///
    /// # Safety
    ///
    /// When a library is loaded, initialisation routines contained within it are executed.
    /// For the purposes of safety, the execution of these routines is conceptually the same calling
    /// an unknown foreign function and may impose arbitrary requirements on the caller for the call
    /// to be sound. The exported symbol is assumed to have the signature `int foo(const char*)`;
    /// this cannot be verified.
    ///
    /// See [`libloading::Library::new`] for more information.
    pub unsafe fn new(path: &Path) -> Result<Self, InitError> {
        Self::with_symbol(path, ENTRY_POINT_NAME)
    }

    /// Loads the library at `path` and resolves `symbol` as the entry point.
    ///
    /// # Safety
    ///
    /// See [`NativeLibrary::new`]. The symbol must have the signature of [`EntryPoint`].
    pub unsafe fn with_symbol(path: &Path, symbol: &str) -> Result<Self, InitError> {
        // A path with a directory component is required to exist; `dlopen` would otherwise fall
        // back to the system search path.
        if path.components().count() > 1 {
            std::fs::metadata(path).map_err(|err| InitError::NotFound(path.to_owned(), err))?;
        }

        let library = Library::new(path).map_err(|source| InitError::LoadLibrary {
            path: path.to_owned(),
            source,
        })?;

        let entry_point = *library
            .get::<EntryPoint>(symbol.as_bytes())
            .map_err(|source| InitError::MissingSymbol {
                path: path.to_owned(),
                symbol: symbol.to_owned(),
                source,
            })?;

        log::debug!("bound '{symbol}' from {}", path.display());

        Ok(NativeLibrary {
            path: path.to_owned(),
            entry_point,
            library,
        })
    }

    /// Returns the path the library was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the resolved entry point. It must not be called after `self` is dropped.
    pub fn entry_point(&self) -> EntryPoint {
        self.entry_point
    }

    /// Unloads the library.
    pub fn close(self) -> Result<(), libloading::Error> {
        log::debug!("unloading {}", self.path.display());
        self.library.close()
    }
}
