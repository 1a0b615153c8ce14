use chrono::NaiveDate;
use packwise_engine::{calculate, CalculationError, MatchedPair};
use packwise_model::{
    Calculation, Condition, Day, DayField, ExtraQuantity, Increment, Operator, Person,
};
use packwise_types::TripId;

struct Grid {
    people: Vec<Person>,
    days: Vec<Day>,
}

impl Grid {
    fn new(ages: &[Option<u32>], travel: &[bool]) -> Self {
        let trip_id = TripId::from_u128(1);
        let people = ages
            .iter()
            .enumerate()
            .map(|(i, age)| {
                let mut p = Person::new(trip_id, format!("p{i}"));
                p.age = *age;
                p
            })
            .collect();
        let days = travel
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let date = NaiveDate::from_ymd_opt(2026, 8, i as u32 + 1).unwrap();
                let mut d = Day::new(trip_id, date, "Lyon", "mild");
                d.travel = *t;
                d
            })
            .collect();
        Self { people, days }
    }

    fn pairs(&self) -> Vec<MatchedPair<'_>> {
        let mut pairs = Vec::new();
        for (day_index, day) in self.days.iter().enumerate() {
            for person in &self.people {
                pairs.push(MatchedPair {
                    person,
                    day,
                    day_index,
                });
            }
        }
        pairs
    }
}

// ── Base quantity ────────────────────────────────────────────────

#[test]
fn fixed_quantity_ignores_grid_size() {
    let grid = Grid::new(&[Some(30), Some(31)], &[false, false, false]);
    let out = calculate(&Calculation::fixed(2), &grid.pairs());
    assert_eq!(out.quantity, 2);
    assert!(out.errors.is_empty());
}

#[test]
fn per_person_and_per_day_multiply() {
    let grid = Grid::new(&[Some(30), Some(31)], &[false, false, false]);
    let pairs = grid.pairs();
    assert_eq!(calculate(&Calculation::per_person(1), &pairs).quantity, 2);
    assert_eq!(calculate(&Calculation::per_day(1), &pairs).quantity, 3);
    assert_eq!(calculate(&Calculation::per_person_per_day(2), &pairs).quantity, 12);
}

#[test]
fn empty_match_set_is_zero() {
    let out = calculate(&Calculation::fixed(5), &[]);
    assert_eq!(out.quantity, 0);
}

// ── Days pattern ─────────────────────────────────────────────────

#[test]
fn every_n_days_rounds_as_configured() {
    let grid = Grid::new(&[Some(30)], &[false; 5]);
    let pairs = grid.pairs();
    assert_eq!(calculate(&Calculation::fixed(1).every(2, true), &pairs).quantity, 3);
    assert_eq!(calculate(&Calculation::fixed(1).every(2, false), &pairs).quantity, 2);
}

#[test]
fn every_zero_days_counts_each_day() {
    let grid = Grid::new(&[Some(30)], &[false; 4]);
    let out = calculate(&Calculation::fixed(1).every(0, false), &grid.pairs());
    assert_eq!(out.quantity, 4);
}

// ── Extras and increments ────────────────────────────────────────

#[test]
fn extra_per_person_is_added() {
    let grid = Grid::new(&[Some(30), Some(8)], &[false, false]);
    let calc = Calculation::per_day(1).with_extra(ExtraQuantity {
        quantity: 1,
        per_person: true,
        per_day: false,
    });
    assert_eq!(calculate(&calc, &grid.pairs()).quantity, 2 + 2);
}

#[test]
fn when_increment_counts_matching_pairs() {
    let grid = Grid::new(&[Some(30), Some(8)], &[true, false, false]);
    let calc = Calculation::fixed(1).with_increment(Increment::When {
        condition: Condition::day(DayField::Travel, Operator::Equals, true),
        quantity: 1,
    });
    // one travel day, two people on it
    assert_eq!(calculate(&calc, &grid.pairs()).quantity, 1 + 2);
}

#[test]
fn per_age_increment_uses_full_years() {
    let grid = Grid::new(&[Some(35), Some(10), None], &[false]);
    let calc = Calculation::fixed(0).with_increment(Increment::PerAge {
        years: 10,
        quantity: 1,
    });
    assert_eq!(calculate(&calc, &grid.pairs()).quantity, 3 + 1);
}

#[test]
fn per_age_without_ages_is_zeroed_and_reported() {
    let grid = Grid::new(&[None, None], &[false]);
    let calc = Calculation::fixed(2).with_increment(Increment::PerAge {
        years: 5,
        quantity: 1,
    });
    let out = calculate(&calc, &grid.pairs());
    assert_eq!(out.quantity, 2);
    assert_eq!(out.errors, vec![CalculationError::MissingField("age")]);
}

#[test]
fn failing_increment_condition_is_reported() {
    let grid = Grid::new(&[Some(30)], &[false]);
    let calc = Calculation::fixed(1).with_increment(Increment::When {
        condition: Condition::day(DayField::Travel, Operator::GreaterThan, true),
        quantity: 4,
    });
    let out = calculate(&calc, &grid.pairs());
    assert_eq!(out.quantity, 1);
    assert!(matches!(out.errors[..], [CalculationError::Condition(_)]));
}

#[test]
fn quantities_exceed_u32_range() {
    let grid = Grid::new(&[Some(30), Some(31)], &[false; 3]);
    let calc = Calculation::per_person_per_day(u32::MAX).with_extra(ExtraQuantity {
        quantity: u32::MAX,
        per_person: true,
        per_day: true,
    });
    let out = calculate(&calc, &grid.pairs());
    assert_eq!(out.quantity, 6 * u64::from(u32::MAX) * 2);
}
