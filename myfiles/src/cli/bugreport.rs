use bugreport::{
    bugreport,
    collector::{CompileTimeInformation, EnvironmentVariables, OperatingSystem, SoftwareVersion},
    format::Markdown,
};
use client::config::{BUCKET_VAR, ORIGIN_VAR, SIGNED_URL_TTL_VAR, TABLE_VAR, URL_VAR};

pub fn run() {
    // Keys and tokens stay out of the report.
    bugreport!()
        .info(SoftwareVersion::default())
        .info(OperatingSystem::default())
        .info(EnvironmentVariables::list(&[
            "SHELL",
            "TERM",
            "RUST_LOG",
            URL_VAR,
            BUCKET_VAR,
            TABLE_VAR,
            ORIGIN_VAR,
            SIGNED_URL_TTL_VAR,
        ]))
        .info(CompileTimeInformation::default())
        .print::<Markdown>();
}
