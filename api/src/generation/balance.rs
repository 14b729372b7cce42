use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::schema::counters;

pub const REGION_SPAIN: &str = "espana";
pub const REGION_LATAM: &str = "latam";

const BALANCE_KEY: &str = "region-balance";

/// Share of published coverage that should come from Spain.
const SPAIN_TARGET_SHARE: f64 = 0.6;

/// The under-represented region relative to the target ratio. Ties go to
/// Latin America (Spain is exactly at target, not under it).
pub fn pick_region(spain_count: i64, latam_count: i64, spain_target_share: f64) -> &'static str {
    let total = spain_count + latam_count;
    if total == 0 {
        return REGION_SPAIN;
    }

    let spain_share = spain_count as f64 / total as f64;
    if spain_share < spain_target_share {
        REGION_SPAIN
    } else {
        REGION_LATAM
    }
}

pub async fn suggest_region(conn: &mut AsyncPgConnection) -> Result<&'static str, eyre::Error> {
    let spain = region_count(conn, REGION_SPAIN).await?;
    let latam = region_count(conn, REGION_LATAM).await?;
    Ok(pick_region(spain, latam, SPAIN_TARGET_SHARE))
}

pub async fn increment_region(
    conn: &mut AsyncPgConnection,
    region: &str,
) -> Result<(), eyre::Error> {
    let updated = diesel::update(counters::table)
        .filter(counters::key.eq(BALANCE_KEY))
        .filter(counters::name.eq(region))
        .set(counters::count.eq(counters::count + 1))
        .execute(conn)
        .await?;

    if updated == 0 {
        diesel::insert_into(counters::table)
            .values((
                counters::key.eq(BALANCE_KEY),
                counters::name.eq(region),
                counters::count.eq(1i64),
            ))
            .execute(conn)
            .await?;
    }

    Ok(())
}

async fn region_count(conn: &mut AsyncPgConnection, region: &str) -> Result<i64, eyre::Error> {
    let count = counters::table
        .filter(counters::key.eq(BALANCE_KEY))
        .filter(counters::name.eq(region))
        .select(counters::count)
        .first::<i64>(conn)
        .await
        .optional()?;

    Ok(count.unwrap_or(0))
}

/// Countries we can place directly; anything else falls back to the
/// balance suggestion.
pub fn region_for_country(country: &str) -> Option<&'static str> {
    match country.trim().to_lowercase().as_str() {
        "españa" | "espana" | "spain" => Some(REGION_SPAIN),
        "argentina" | "bolivia" | "brasil" | "brazil" | "chile" | "colombia" | "costa rica"
        | "cuba" | "ecuador" | "el salvador" | "guatemala" | "honduras" | "méxico" | "mexico"
        | "nicaragua" | "panamá" | "panama" | "paraguay" | "perú" | "peru"
        | "república dominicana" | "republica dominicana" | "uruguay" | "venezuela" => {
            Some(REGION_LATAM)
        }
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_empty_counters_start_with_spain() {
        assert_eq!(pick_region(0, 0, 0.6), REGION_SPAIN);
    }

    #[test]
    fn test_under_represented_region_is_suggested() {
        // 2/10 from Spain against a 0.6 target
        assert_eq!(pick_region(2, 8, 0.6), REGION_SPAIN);
        // 9/10 from Spain, time for Latin America
        assert_eq!(pick_region(9, 1, 0.6), REGION_LATAM);
    }

    #[test]
    fn test_exact_target_goes_to_latam() {
        assert_eq!(pick_region(6, 4, 0.6), REGION_LATAM);
    }

    #[test]
    fn test_region_for_country() {
        assert_eq!(region_for_country("España"), Some(REGION_SPAIN));
        assert_eq!(region_for_country(" mexico "), Some(REGION_LATAM));
        assert_eq!(region_for_country("France"), None);
    }
}
