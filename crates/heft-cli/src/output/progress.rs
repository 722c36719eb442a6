//! Per-wave progress lines for batch analysis.

use heft_core::Resolution;
use heft_resolver::{BatchProgress, PackageReport, SizeTotals};

use super::{colors::ColorSupport, format_bytes};

/// Header line for a completed wave
pub fn wave_line(progress: &BatchProgress<'_>) -> String {
    format!(
        "[{}/{}] {}/{} packages, {} ({} gzip)",
        progress.wave + 1,
        progress.waves,
        progress.completed,
        progress.total,
        format_bytes(progress.totals.size),
        format_bytes(progress.totals.gzip),
    )
}

/// One line per package
pub fn package_line(colors: &ColorSupport, package: &PackageReport) -> String {
    let label = format!("{}@{}", package.name, package.requested_version);
    match &package.stats {
        Resolution::Resolved(stats) => format!(
            "  {} {} ({} gzip)",
            label,
            colors.bold(&format_bytes(stats.size)),
            format_bytes(stats.gzip),
        ),
        Resolution::Unresolved => format!("  {} {}", label, colors.yellow("size unknown")),
    }
}

/// Closing summary
pub fn totals_line(totals: &SizeTotals) -> String {
    let mut line = format!(
        "Total: {} ({} gzip) across {} packages",
        format_bytes(totals.size),
        format_bytes(totals.gzip),
        totals.resolved,
    );
    if totals.unresolved > 0 {
        line.push_str(&format!(", {} with unknown size", totals.unresolved));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use heft_core::BundleStats;

    fn report(name: &str, stats: Resolution) -> PackageReport {
        PackageReport {
            name: name.to_string(),
            requested_version: "^1.0.0".to_string(),
            stats,
        }
    }

    #[test]
    fn test_package_lines() {
        let colors = ColorSupport::disabled();

        let known = report("left-pad", Resolution::Resolved(BundleStats::sized(11000, 3300)));
        assert_eq!(package_line(&colors, &known), "  left-pad@^1.0.0 10.7 KB (3.2 KB gzip)");

        let unknown = report("ghost", Resolution::Unresolved);
        assert_eq!(package_line(&colors, &unknown), "  ghost@^1.0.0 size unknown");
    }

    #[test]
    fn test_wave_and_totals_lines() {
        let totals = SizeTotals {
            size: 2000,
            gzip: 600,
            resolved: 5,
            unresolved: 2,
        };
        let progress = BatchProgress {
            wave: 1,
            waves: 2,
            completed: 7,
            total: 7,
            reports: &[],
            totals,
        };

        assert_eq!(wave_line(&progress), "[2/2] 7/7 packages, 2.0 KB (600 B gzip)");
        assert_eq!(
            totals_line(&totals),
            "Total: 2.0 KB (600 B gzip) across 5 packages, 2 with unknown size"
        );
    }
}
