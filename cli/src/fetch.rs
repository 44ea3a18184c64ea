use xb_crawler::{compute_local_paths, crawl_schemas, write_manifest, FetchManifest, FetchOptions, HttpTransport};

use crate::cli::FetchArgs;
use crate::error::CliError;

pub fn run(args: &FetchArgs) -> Result<(), CliError> {
    let options = FetchOptions { fail_fast: args.fail_fast };
    let transport = HttpTransport;
    let fetched = crawl_schemas(&args.root_url, &transport, options)?;

    std::fs::create_dir_all(&args.output_dir)?;
    let locations = compute_local_paths(&fetched);
    for (schema, location) in fetched.iter().zip(&locations) {
        let out_path = args.output_dir.join(&location.local_path);
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&out_path, &schema.content)?;
        tracing::info!(url = %schema.source_url, path = %out_path.display(), "wrote fetched schema");
    }

    let manifest_path = args.manifest.to_string_lossy().into_owned();
    let manifest = FetchManifest { root_url: args.root_url.clone(), fetched_at: now_iso8601(), schemas: locations };
    write_manifest(&manifest_path, &manifest)?;
    tracing::info!(path = %args.manifest.display(), "wrote fetch manifest");

    Ok(())
}

/// Formats the current wall-clock time as an ISO-8601 UTC timestamp for the manifest (spec §8).
/// `xb_xstypes::DateTime` models schema-authored literals, not "now" — converting a Unix
/// timestamp to a civil calendar date here uses Howard Hinnant's `civil_from_days` algorithm
/// rather than pulling in a dedicated calendar dependency the rest of the workspace has no other
/// use for.
fn now_iso8601() -> String {
    let since_epoch = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock is after the Unix epoch");
    let secs = since_epoch.as_secs() as i64;
    let (days, time_of_day) = (secs.div_euclid(86_400), secs.rem_euclid(86_400));
    let (year, month, day) = civil_from_days(days);
    let (hour, minute, second) = (time_of_day / 3600, (time_of_day / 60) % 60, time_of_day % 60);
    format!("{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}Z")
}

fn civil_from_days(days_since_epoch: i64) -> (i64, u32, u32) {
    let z = days_since_epoch + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = (z - era * 146_097) as u64;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    let year = if month <= 2 { y + 1 } else { y };
    (year, month, day)
}
