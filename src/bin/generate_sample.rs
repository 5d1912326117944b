//! Writes a synthetic car dataset in the viewer's CSV layout.
//!
//! Usage: `generate_sample [OUT.csv] [--no-cluster]`

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "generate_sample")]
#[command(about = "Write a synthetic car dataset as CSV")]
struct Cli {
    /// Output file (default: cars_dataset_with_cluster.csv, or cars_dataset.csv with --no-cluster)
    out: Option<PathBuf>,

    /// Leave out the Cluster column
    #[arg(long)]
    no_cluster: bool,
}

impl Cli {
    fn output_path(&self) -> PathBuf {
        match &self.out {
            Some(path) => path.clone(),
            None if self.no_cluster => PathBuf::from("cars_dataset.csv"),
            None => PathBuf::from("cars_dataset_with_cluster.csv"),
        }
    }
}

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

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// One manufacturer: name, origin, and typical engine sizes.
struct Maker {
    name: &'static str,
    origin: &'static str,
    lines: &'static [&'static str],
    cylinders: &'static [i64],
}

const MAKERS: &[Maker] = &[
    Maker { name: "chevrolet", origin: "usa", lines: &["chevelle", "impala", "vega", "nova", "monte carlo"], cylinders: &[4, 6, 8] },
    Maker { name: "ford", origin: "usa", lines: &["pinto", "torino", "maverick", "mustang", "galaxie"], cylinders: &[4, 6, 8] },
    Maker { name: "amc", origin: "usa", lines: &["hornet", "gremlin", "matador"], cylinders: &[6, 8] },
    Maker { name: "toyota", origin: "japan", lines: &["corolla", "corona", "celica"], cylinders: &[4] },
    Maker { name: "datsun", origin: "japan", lines: &["510", "b210", "280z"], cylinders: &[4, 6] },
    Maker { name: "honda", origin: "japan", lines: &["civic", "accord"], cylinders: &[4] },
    Maker { name: "volkswagen", origin: "europe", lines: &["rabbit", "beetle", "dasher"], cylinders: &[4] },
    Maker { name: "peugeot", origin: "europe", lines: &["504", "604"], cylinders: &[4, 6] },
    Maker { name: "volvo", origin: "europe", lines: &["144ea", "245", "264gl"], cylinders: &[4, 6] },
];

struct Car {
    model: String,
    origin: &'static str,
    mpg: f64,
    cylinders: i64,
    displacement: f64,
    horsepower: f64,
    weight: i64,
    acceleration: f64,
    year: i64,
}

fn generate_car(rng: &mut SimpleRng) -> Car {
    let maker = rng.pick(MAKERS);
    let line = rng.pick(maker.lines);
    let cylinders = *rng.pick(maker.cylinders);
    let year = 70 + (rng.next_u64() % 13) as i64;

    let displacement = (cylinders as f64 * rng.gauss(38.0, 5.0)).max(68.0).round();
    let horsepower = (displacement * rng.gauss(0.55, 0.06) + 20.0).round();
    let weight = (1200.0 + displacement * 7.5 + rng.gauss(0.0, 180.0)).round() as i64;
    let mpg = (52.0 - weight as f64 / 110.0 + (year - 70) as f64 * 0.6 + rng.gauss(0.0, 2.0))
        .clamp(9.0, 46.6);
    let acceleration = (24.0 - horsepower / 12.0 + rng.gauss(0.0, 1.2)).clamp(8.0, 24.8);

    Car {
        model: format!("{} {line}", maker.name),
        origin: maker.origin,
        mpg: (mpg * 10.0).round() / 10.0,
        cylinders,
        displacement,
        horsepower,
        weight,
        acceleration: (acceleration * 10.0).round() / 10.0,
        year,
    }
}

/// Coarse grouping by engine size and efficiency; extreme cars are outliers (-1).
fn cluster_of(car: &Car) -> i64 {
    if car.horsepower > 200.0 || car.mpg > 42.0 {
        -1
    } else if car.cylinders >= 8 {
        0
    } else if car.cylinders == 6 {
        1
    } else if car.mpg >= 28.0 {
        2
    } else {
        3
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let with_cluster = !cli.no_cluster;
    let output_path = cli.output_path();

    let mut rng = SimpleRng::new(42);
    let mut writer = csv::Writer::from_path(&output_path)?;

    let mut header = vec![
        "Model", "MPG", "Cylinders", "Displacement", "Horsepower", "Weight", "Acceleration", "Year",
        "Origin",
    ];
    if with_cluster {
        header.push("Cluster");
    }
    writer.write_record(&header)?;

    let n_cars = 398;
    for _ in 0..n_cars {
        let car = generate_car(&mut rng);
        let mut row = vec![
            car.model.clone(),
            car.mpg.to_string(),
            car.cylinders.to_string(),
            car.displacement.to_string(),
            car.horsepower.to_string(),
            car.weight.to_string(),
            car.acceleration.to_string(),
            car.year.to_string(),
            car.origin.to_string(),
        ];
        if with_cluster {
            row.push(cluster_of(&car).to_string());
        }
        writer.write_record(&row)?;
    }
    writer.flush()?;

    println!(
        "Wrote {n_cars} cars to {} (cluster column: {with_cluster})",
        output_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_follows_the_cluster_flag() {
        let cli = Cli::try_parse_from(["generate_sample"]).unwrap();
        assert!(!cli.no_cluster);
        assert_eq!(cli.output_path(), PathBuf::from("cars_dataset_with_cluster.csv"));

        let cli = Cli::try_parse_from(["generate_sample", "--no-cluster"]).unwrap();
        assert_eq!(cli.output_path(), PathBuf::from("cars_dataset.csv"));
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(Cli::try_parse_from(["generate_sample", "--no-clusters"]).is_err());
        let cli = Cli::try_parse_from(["generate_sample", "--no-cluster", "out.csv"]).unwrap();
        assert_eq!(cli.output_path(), PathBuf::from("out.csv"));
    }

    #[test]
    fn outliers_are_extreme_cars() {
        let mut rng = SimpleRng::new(7);
        let mut car = generate_car(&mut rng);
        car.horsepower = 230.0;
        assert_eq!(cluster_of(&car), -1);
        car.horsepower = 150.0;
        car.mpg = 15.0;
        car.cylinders = 8;
        assert_eq!(cluster_of(&car), 0);
    }
}
