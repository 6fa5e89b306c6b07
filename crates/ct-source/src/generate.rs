use chrono::NaiveTime;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use ct_core::{Language, Outlet, OutletId, Priority, SalesRep, TimeWindow};

use crate::{AdditionalOutlet, Dataset};

const LANGUAGES: [Language; 3] = [Language::Hindi, Language::English, Language::Telugu];
const DND_RATIO: f64 = 0.1;

/// One rng per (rep position, outlet slot) so an outlet keeps its attributes
/// no matter which other reps are selected.
fn rng_for(seed: u64, rep_pos: usize, slot: u64) -> StdRng {
    let mixed = seed
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add((rep_pos as u64) << 32)
        .wrapping_add(slot);
    StdRng::seed_from_u64(mixed)
}

fn pick_language(rng: &mut StdRng) -> Language {
    LANGUAGES.choose(rng).copied().unwrap_or(Language::Hindi)
}

fn pick_priority(rng: &mut StdRng) -> Priority {
    Priority::ALL.choose(rng).copied().unwrap_or(Priority::Medium)
}

/// `HH:00` to `HH+1:00`.
fn slot(hour: u32) -> TimeWindow {
    let start = NaiveTime::from_hms_opt(hour.min(22), 0, 0).unwrap_or_default();
    TimeWindow::hour_from(start)
}

pub fn pjp_outlets(rep: &SalesRep, rep_pos: usize, seed: u64) -> Vec<Outlet> {
    rep.pjp_today
        .iter()
        .enumerate()
        .map(|(i, visit)| {
            let mut rng = rng_for(seed, rep_pos, i as u64);
            Outlet {
                id: OutletId::in_pjp(&rep.id, i),
                name: visit.outlet.clone(),
                phones: vec![visit.phone.clone()],
                window: TimeWindow::hour_from(visit.time),
                expected_value: visit.expected_value,
                language: pick_language(&mut rng),
                whatsapp_opt_in: rng.gen_bool(0.7),
                last_order_days: rng.gen_range(1..=30),
                priority: pick_priority(&mut rng),
                rep_id: rep.id.clone(),
                in_pjp: true,
                dnd: rng.gen_bool(DND_RATIO),
            }
        })
        .collect()
}

pub fn additional_outlets(
    rep: &SalesRep,
    rep_pos: usize,
    templates: &[AdditionalOutlet],
    per_rep: usize,
    seed: u64,
) -> Vec<Outlet> {
    templates
        .iter()
        .take(per_rep)
        .enumerate()
        .map(|(i, t)| {
            let mut rng = rng_for(seed, rep_pos, 1_000 + i as u64);
            Outlet {
                id: OutletId::not_in_pjp(&rep.id, i),
                name: format!("{} {}", t.name, rep_pos + 1),
                phones: vec![t.phone.clone()],
                window: slot(9 + 2 * i as u32),
                expected_value: t.expected_value,
                language: pick_language(&mut rng),
                whatsapp_opt_in: rng.gen_bool(0.5),
                last_order_days: rng.gen_range(30..=89),
                priority: t.priority,
                rep_id: rep.id.clone(),
                in_pjp: false,
                dnd: rng.gen_bool(DND_RATIO),
            }
        })
        .collect()
}

/// Outlets of the given reps: journey-plan outlets of every rep first, then
/// the additional ones. Reps keep their dataset order.
pub fn expand_outlets(ds: &Dataset, rep_ids: &[&str]) -> Vec<Outlet> {
    let chosen: Vec<(usize, &SalesRep)> = ds
        .reps
        .iter()
        .enumerate()
        .filter(|(_, r)| rep_ids.contains(&r.id.as_str()))
        .collect();
    let mut out: Vec<Outlet> = chosen.iter().flat_map(|(pos, rep)| pjp_outlets(rep, *pos, ds.seed)).collect();
    out.extend(
        chosen
            .iter()
            .flat_map(|(pos, rep)| additional_outlets(rep, *pos, &ds.additional, ds.additional_per_rep, ds.seed)),
    );
    out
}
