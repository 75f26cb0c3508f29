use anyhow::{Context, Result};
use serde_json::{Map, Value as JsonValue};

const OUTPUT_PATH: &str = "sample_risk_data.csv";

const HEADER: [&str; 7] = [
    "Asset Name",
    "Business Category",
    "Risk Rating",
    "Risk Factors",
    "Year",
    "Lat",
    "Long",
];

const RISK_FACTORS: [&str; 7] = [
    "Flooding",
    "Wildfire",
    "Extreme heat",
    "Drought",
    "Sea level rise",
    "Tropical storm",
    "Volcano",
];

/// (name, category, lat, long, base rating)
const ASSETS: [(&str, &str, f64, f64, f64); 8] = [
    ("Harbour Terminal", "Logistics", 51.5072, -0.1276, 4.0),
    ("River Dam", "Energy", 46.2044, 6.1432, 3.0),
    ("Solar Farm", "Energy", 33.4484, -112.074, 5.5),
    ("Grain Silo", "Agriculture", 41.8781, -87.6298, 2.5),
    ("Coastal Refinery", "Energy", 29.7604, -95.3698, 6.0),
    ("Data Centre", "Technology", 59.3293, 18.0686, 1.5),
    ("Vineyard", "Agriculture", 38.2975, -122.2869, 4.5),
    ("Island Resort", "Hospitality", 19.8968, -155.5828, 5.0),
];

const YEARS: std::ops::RangeInclusive<i32> = 2030..=2070;
const YEAR_STEP: usize = 10;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// A JSON object holding a random subset of risk factors with scores.
fn risk_factors(rng: &mut SimpleRng, pressure: f64) -> String {
    let mut map = Map::new();
    for factor in RISK_FACTORS {
        if rng.next_f64() < 0.25 + 0.4 * pressure {
            let score = (rng.next_f64() * 100.0).round() / 100.0;
            map.insert(factor.to_string(), JsonValue::from(score));
        }
    }
    JsonValue::Object(map).to_string()
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let mut writer = csv::Writer::from_path(OUTPUT_PATH)
        .with_context(|| format!("creating {OUTPUT_PATH}"))?;
    writer.write_record(HEADER)?;

    let mut rows = 0;
    for (name, category, lat, long, base) in ASSETS {
        for (step, year) in YEARS.step_by(YEAR_STEP).enumerate() {
            // Ratings drift upwards over the decades, with some noise.
            let pressure = step as f64 / 4.0;
            let rating = (base + pressure * 2.0 + (rng.next_f64() - 0.5)).clamp(0.0, 10.0);
            writer.write_record([
                name.to_string(),
                category.to_string(),
                format!("{rating:.2}"),
                risk_factors(&mut rng, pressure),
                year.to_string(),
                format!("{lat}"),
                format!("{long}"),
            ])?;
            rows += 1;
        }
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {rows} asset-year records to {OUTPUT_PATH}");
    Ok(())
}
