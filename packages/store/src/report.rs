//! Markdown report output.
//!
//! One section per ranked development: a heading linking to the detail
//! page, followed by the distance from the target address.

use std::fmt::Write as _;
use std::path::Path;

use crate::{RankedDevelopment, StoreError};

/// Renders the ranked developments as Markdown.
#[must_use]
pub fn render_report(ranked: &[RankedDevelopment]) -> String {
    let mut out = String::new();
    for item in ranked {
        writeln!(
            out,
            "## [{}]({})",
            item.development.address, item.development.link
        )
        .unwrap();
        writeln!(out, "Distance from target: {:.2} miles", item.distance_miles).unwrap();
        writeln!(out).unwrap();
    }
    out
}

/// Writes the Markdown report to `path`.
///
/// # Errors
///
/// Returns [`StoreError`] if the file write fails.
pub fn write_report(path: &Path, ranked: &[RankedDevelopment]) -> Result<(), StoreError> {
    std::fs::write(path, render_report(ranked))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dev_comps_models::{Development, GeoPoint};

    #[test]
    fn renders_heading_link_and_distance() {
        let ranked = vec![RankedDevelopment {
            development: Development {
                address: "10 Stonley Road".to_owned(),
                link: "https://www.bostonplans.org/projects/development-projects/10-stonley-road"
                    .to_owned(),
                location: Some(GeoPoint {
                    latitude: 42.31,
                    longitude: -71.11,
                }),
            },
            distance_miles: 1.2345,
        }];

        let report = render_report(&ranked);

        assert_eq!(
            report,
            "## [10 Stonley Road](https://www.bostonplans.org/projects/development-projects/10-stonley-road)\n\
             Distance from target: 1.23 miles\n\n"
        );
    }

    #[test]
    fn empty_ranking_renders_empty_report() {
        assert!(render_report(&[]).is_empty());
    }

    #[test]
    fn sections_appear_in_ranking_order() {
        let make = |address: &str, distance_miles: f64| RankedDevelopment {
            development: Development::new(
                address.to_owned(),
                format!("https://example.org/{address}"),
            ),
            distance_miles,
        };
        let report = render_report(&[make("a", 0.5), make("b", 1.5)]);

        let a_pos = report.find("## [a]").unwrap();
        let b_pos = report.find("## [b]").unwrap();
        assert!(a_pos < b_pos);
    }
}
