mod binding;

use std::{ffi::OsString, io::Write};

use clap::Parser;
use stampcall_invoker::{Clock, Invoker, Report, SystemClock};
use stampcall_lsan::CleanupStack;

pub use binding::{native_library_path, Binding, NATIVE_DIR, NATIVE_LIB};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {}

/// Parses `args` and runs the program: binds the native entry point, calls it with the current
/// time and prints the result to stdout.
///
/// The exit-time leak check is registered before anything else and therefore runs after the
/// foreign buffer is released and the native library is unloaded, on success and on error alike.
pub fn run_with_args<T, I>(args: I) -> anyhow::Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let Args {} = Args::parse_from(args);

    let mut deferred = CleanupStack::new();
    stampcall_lsan::install_exit_hook(&mut deferred);

    let binding = Binding::bind()?;
    let stdout = std::io::stdout();
    run(&binding, &SystemClock, &mut stdout.lock())?;
    Ok(())
}

/// Calls the bound entry point with the time read from `clock` and writes `Result: <n>` to `out`.
pub fn run<W: Write>(binding: &Binding, clock: &impl Clock, out: &mut W) -> anyhow::Result<Report> {
    // SAFETY: a `Binding` only holds entry points with the `int foo(const char*)` contract, and
    // borrowing it keeps its library loaded while the invoker is used.
    let invoker = unsafe { Invoker::new(binding.entry_point()) };
    let report = invoker.run_and_report(clock, out)?;
    log::info!("'{}' -> {}", report.timestamp, report.result);
    Ok(report)
}
