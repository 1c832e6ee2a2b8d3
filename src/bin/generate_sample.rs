//! Generates a deterministic `vehicles_us.csv` sample so the dashboard can
//! be tried without the real dataset.

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
        &items[(self.next_u64() as usize) % items.len()]
    }
}

struct Catalog {
    manufacturer: &'static str,
    models: &'static [(&'static str, &'static str, f64)], // (model, body type, new price)
}

const CATALOG: &[Catalog] = &[
    Catalog {
        manufacturer: "ford",
        models: &[
            ("f-150", "pickup", 42_000.0),
            ("focus", "sedan", 21_000.0),
            ("escape", "suv", 28_000.0),
        ],
    },
    Catalog {
        manufacturer: "toyota",
        models: &[
            ("camry", "sedan", 27_000.0),
            ("corolla", "sedan", 22_000.0),
            ("rav4", "suv", 29_000.0),
            ("tacoma", "pickup", 33_000.0),
        ],
    },
    Catalog {
        manufacturer: "honda",
        models: &[
            ("civic", "sedan", 24_000.0),
            ("cr-v", "suv", 28_000.0),
            ("odyssey", "mini-van", 35_000.0),
        ],
    },
    Catalog {
        manufacturer: "bmw",
        models: &[("x5", "suv", 62_000.0), ("3 series", "sedan", 44_000.0)],
    },
    Catalog {
        manufacturer: "chevrolet",
        models: &[
            ("silverado 1500", "pickup", 40_000.0),
            ("malibu", "sedan", 24_000.0),
        ],
    },
];

const CONDITIONS: &[&str] = &["excellent", "good", "fair", "like new", "salvage"];

fn main() {
    let mut rng = SimpleRng::new(42);

    let output_path = "vehicles_us.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");
    writer
        .write_record([
            "price",
            "odometer",
            "model_year",
            "manufacturer",
            "type",
            "model",
            "condition",
        ])
        .expect("Failed to write header");

    let n_rows = 800;
    for _ in 0..n_rows {
        let catalog = rng.pick(CATALOG);
        let &(model, body_type, new_price) = rng.pick(catalog.models);

        let year = 2001 + (rng.next_u64() % 21) as i64;
        let age = (2022 - year) as f64;

        // Mileage roughly tracks age; price depreciates with both.
        let odometer = (age * 12_000.0 + rng.gauss(0.0, 15_000.0)).max(500.0);
        let price = (new_price * 0.88_f64.powf(age) - odometer * 0.03
            + rng.gauss(0.0, 1_500.0))
        .max(400.0);

        // The real dataset has gaps; reproduce them.
        let price_cell = if rng.next_f64() < 0.04 {
            String::new()
        } else {
            format!("{:.0}", price)
        };
        let odometer_cell = if rng.next_f64() < 0.08 {
            String::new()
        } else {
            format!("{:.0}", odometer)
        };
        let year_cell = if rng.next_f64() < 0.05 {
            String::new()
        } else {
            format!("{year}.0")
        };

        writer
            .write_record([
                price_cell.as_str(),
                odometer_cell.as_str(),
                year_cell.as_str(),
                catalog.manufacturer,
                body_type,
                model,
                *rng.pick(CONDITIONS),
            ])
            .expect("Failed to write row");
    }

    writer.flush().expect("Failed to flush output");
    println!("Wrote {n_rows} listings to {output_path}");
}
