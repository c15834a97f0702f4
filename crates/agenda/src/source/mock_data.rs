use agenda_core::calendar::RawAppointment;
use agenda_core::week::week_start;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

const CONTACTS: [(i64, &str, &str); 6] = [
    (101, "Lucía", "Pérez"),
    (102, "Jorge", "Sanz"),
    (103, "Marta", "Iglesias"),
    (104, "Andrés", "Quintana"),
    (105, "Paula", "Ferrer"),
    (106, "Diego", "Roldán"),
];

const LISTINGS: [(i64, &str); 4] = [
    (201, "Av. del Puerto 14"),
    (202, "Calle Mayor 3, 2ºB"),
    (203, "Paseo de la Castellana 88"),
    (204, "Camino Viejo 7"),
];

const AGENTS: [&str; 2] = ["Elena Vidal", "Tomás Herrero"];

fn at(date: NaiveDate, hour: i64, minute: i64) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN) + Duration::hours(hour) + Duration::minutes(minute)
}

/// Generates demo appointments for the week containing `center_date`.
///
/// Ids are derived from the week so that several weeks can be combined
/// without collisions.
pub fn generate_demo_week(center_date: NaiveDate) -> Vec<RawAppointment> {
    let monday = week_start(center_date);
    let seed = i64::from(monday.num_days_from_ce()) / 7;
    let base_id = seed * 100;
    let pick = |offset: i64, len: usize| ((seed + offset).rem_euclid(len as i64)) as usize;

    let (contact_id, first, last) = CONTACTS[pick(0, CONTACTS.len())];
    let (listing_id, street) = LISTINGS[pick(0, LISTINGS.len())];
    let agent = AGENTS[pick(0, AGENTS.len())];

    let mut appointments = Vec::new();

    // Monday morning viewing
    appointments.push(
        RawAppointment::new(base_id + 1, at(monday, 10, 0), at(monday, 11, 0))
            .with_contact(contact_id, first, last)
            .with_listing(listing_id, street)
            .with_agent(agent)
            .with_type("Visita"),
    );

    // Wednesday valuation, already completed
    let (contact_id, first, last) = CONTACTS[pick(1, CONTACTS.len())];
    let (listing_id, street) = LISTINGS[pick(1, LISTINGS.len())];
    let wednesday = monday + Duration::days(2);
    appointments.push(
        RawAppointment::new(base_id + 2, at(wednesday, 16, 30), at(wednesday, 17, 30))
            .with_contact(contact_id, first, last)
            .with_listing(listing_id, street)
            .with_agent(agent)
            .with_type("Tasación")
            .with_status("Completed"),
    );

    // Thursday signing
    let (contact_id, first, last) = CONTACTS[pick(2, CONTACTS.len())];
    let thursday = monday + Duration::days(3);
    appointments.push(
        RawAppointment::new(base_id + 3, at(thursday, 12, 0), at(thursday, 13, 0))
            .with_contact(contact_id, first, last)
            .with_agent(AGENTS[pick(1, AGENTS.len())])
            .with_type("Firma")
            .with_notes("Traer nota simple"),
    );

    // Friday viewing the client did not attend
    let (contact_id, first, last) = CONTACTS[pick(3, CONTACTS.len())];
    let (listing_id, street) = LISTINGS[pick(2, LISTINGS.len())];
    let friday = monday + Duration::days(4);
    appointments.push(
        RawAppointment::new(base_id + 4, at(friday, 9, 0), at(friday, 9, 45))
            .with_contact(contact_id, first, last)
            .with_listing(listing_id, street)
            .with_status("NoShow"),
    );

    // Saturday open house, cancelled every other week
    let saturday = monday + Duration::days(5);
    let (listing_id, street) = LISTINGS[pick(3, LISTINGS.len())];
    let status = if seed % 2 == 0 { "Scheduled" } else { "Cancelled" };
    appointments.push(
        RawAppointment::new(base_id + 5, at(saturday, 11, 0), at(saturday, 13, 0))
            .with_listing(listing_id, street)
            .with_type("Jornada de puertas abiertas")
            .with_status(status),
    );

    appointments
}

/// Generates demo appointments for `weeks` weeks on each side of `center_date`.
pub fn generate_demo_appointments(center_date: NaiveDate, weeks: i64) -> Vec<RawAppointment> {
    (-weeks..=weeks)
        .flat_map(|offset| generate_demo_week(center_date + Duration::weeks(offset)))
        .collect()
}
