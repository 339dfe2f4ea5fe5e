//! Writes a synthetic extract in the layout of the Eurostat `ilc_iw01` CSV
//! download, for trying the dashboard without network access.
//!
//! Usage: `generate-sample [OUTPUT]` (defaults to `estat_ilc_iw01_en.csv`).

use anyhow::Context;

use inwork_poverty::data::loader::DATA_FILE_NAME;

const HEADERS: [&str; 12] = [
    "DATAFLOW",
    "LAST UPDATE",
    "freq",
    "wstatus",
    "sex",
    "age",
    "unit",
    "geo",
    "TIME_PERIOD",
    "OBS_VALUE",
    "OBS_FLAG",
    "CONF_STATUS",
];

const DATAFLOW: &str = "ESTAT:ILC_IW01(1.0)";
const LAST_UPDATE: &str = "15/05/24 23:00:00";

/// Country code, baseline rate and first year with data.
const COUNTRIES: [(&str, f64, i32); 14] = [
    ("AT", 8.0, 2005),
    ("BE", 4.5, 2005),
    ("DE", 8.5, 2005),
    ("DK", 5.5, 2005),
    ("EL", 11.5, 2005),
    ("ES", 11.8, 2005),
    ("FI", 3.0, 2005),
    ("FR", 7.8, 2005),
    ("HU", 8.0, 2005),
    ("IT", 11.0, 2005),
    ("PL", 10.5, 2005),
    ("RO", 15.5, 2007),
    ("SE", 7.0, 2005),
    // Too short a history to survive cleaning.
    ("XK", 9.0, 2020),
];

/// Aggregates present in the real download, removed by the cleaning step.
const AGGREGATES: [(&str, f64); 2] = [("EU27_2020", 8.5), ("EA20", 8.8)];

const SEXES: [(&str, f64); 3] = [("T", 0.0), ("M", 0.6), ("F", -0.6)];

/// `Y_GE18` and `Y_GE65` are not shown by the dashboard and get filtered out.
const AGES: [(&str, f64); 6] = [
    ("TOTAL", 0.0),
    ("Y18-24", 2.5),
    ("Y25-54", -0.3),
    ("Y55-64", 0.4),
    ("Y_GE18", 0.0),
    ("Y_GE65", 1.5),
];

const LAST_YEAR: i32 = 2023;

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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Shift applied to every country in a given year: a bump after each crisis.
fn year_effect(year: i32) -> f64 {
    match year {
        2009..=2012 => 0.8,
        2020 | 2021 => 0.5,
        2022 | 2023 => 0.7,
        _ => 0.0,
    }
}

fn main() -> anyhow::Result<()> {
    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DATA_FILE_NAME.to_string());
    let mut rng = SimpleRng::new(42);

    let mut writer =
        csv::Writer::from_path(&output).with_context(|| format!("failed to create {output}"))?;
    writer.write_record(HEADERS)?;

    let all_geo = COUNTRIES
        .iter()
        .copied()
        .chain(AGGREGATES.iter().map(|&(geo, base)| (geo, base, 2005)));

    let mut rows = 0usize;
    let mut missing = 0usize;
    for (geo, base, first_year) in all_geo {
        for (sex, sex_shift) in SEXES {
            for (age, age_shift) in AGES {
                for year in first_year..=LAST_YEAR {
                    let rate = base + sex_shift + age_shift + year_effect(year) + rng.gauss(0.0, 0.4);
                    // About one value in forty is not available, as in the real download.
                    let (value, flag) = if rng.next_f64() < 0.025 {
                        missing += 1;
                        (String::new(), ":")
                    } else if rng.next_f64() < 0.05 {
                        (format!("{:.1}", rate.max(0.0)), "b")
                    } else {
                        (format!("{:.1}", rate.max(0.0)), "")
                    };
                    let period = year.to_string();
                    writer.write_record([
                        DATAFLOW,
                        LAST_UPDATE,
                        "A",
                        "EMP",
                        sex,
                        age,
                        "PC",
                        geo,
                        period.as_str(),
                        value.as_str(),
                        flag,
                        "",
                    ])?;
                    rows += 1;
                }
            }
        }
    }
    writer.flush()?;

    println!("Wrote {rows} rows ({missing} without a value) to {output}");
    Ok(())
}
