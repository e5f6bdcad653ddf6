use chrono::{Days, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hostel_booking::defaults::default_tables;
use hostel_booking::rooms::DORM_LAYOUT;
use hostel_booking::tables::{BedBooking, CalendarEntry, SuiteBooking, TableSet};
use hostel_booking::{compute_availability, compute_pricing, Stay};
use rand::{seq::SliceRandom, thread_rng, Rng};

// A year of random bookings across every room
fn synthetic_tables(bookings_per_day: usize) -> TableSet {
    let mut rng = thread_rng();
    let mut tables = default_tables();
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let beds = DORM_LAYOUT.unit_ids();
    let rooms = ["jb", "ar", "q007"];

    for offset in 0..365 {
        let date = (start + Days::new(offset)).format("%Y-%m-%d").to_string();
        for _ in 0..bookings_per_day {
            tables.beds.push(BedBooking {
                room_id: rooms.choose(&mut rng).unwrap().to_string(),
                date: date.clone(),
                bed_id: beds.choose(&mut rng).unwrap().clone(),
                status: "booked".to_string(),
            });
        }
        tables.suites.push(SuiteBooking {
            date: date.clone(),
            suite_id: format!("S{}", rng.gen_range(1..=3)),
            status: "booked".to_string(),
        });
        if rng.gen_bool(0.05) {
            tables.calendar.push(CalendarEntry {
                room_id: rooms.choose(&mut rng).unwrap().to_string(),
                date,
                status: "blocked".to_string(),
            });
        }
    }
    tables
}

pub fn availability_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("availability");
    let checkin = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

    for bookings_per_day in [1, 10, 40].iter() {
        let tables = synthetic_tables(*bookings_per_day);
        group.bench_with_input(
            BenchmarkId::from_parameter(bookings_per_day),
            &tables,
            |b, tables| {
                b.iter(|| {
                    let checkout = checkin + Days::new(7);
                    black_box(compute_availability(
                        tables,
                        "q007",
                        Some(checkin),
                        Some(checkout),
                    ))
                });
            },
        );
    }
    group.finish();

    let tables = synthetic_tables(10);
    let stay = Stay::new(checkin, checkin + Days::new(30)).unwrap();
    c.bench_function("pricing_30_nights", |b| {
        b.iter(|| black_box(compute_pricing(&tables, "q777", &stay, 2)))
    });
}

criterion_group!(benches, availability_benchmark);
criterion_main!(benches);
