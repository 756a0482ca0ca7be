//! Classroom student picker

use crate::{Error, RandomSource, Result, Student};

const PICK_WEIGHT_SCALE: i64 = 60;

/// Pick weight of a student once everyone has been picked at least once.
///
/// Students with fewer stars are favored; negative balances count as zero.
pub fn pick_weight(student: &Student) -> u32 {
    let stars = student.stars.max(0);
    (PICK_WEIGHT_SCALE / stars.saturating_add(1)) as u32
}

/// Pick the next student to call on.
///
/// Students never picked go first, chosen uniformly. After that the choice is
/// weighted by [`pick_weight`], falling back to uniform when every weight is
/// zero.
pub fn pick_student<'a, R>(students: &'a [Student], rng: &mut R) -> Result<&'a Student>
where
    R: RandomSource + ?Sized,
{
    if students.is_empty() {
        return Err(Error::not_found("students to pick from"));
    }

    let fresh: Vec<&Student> = students.iter().filter(|s| s.pick_count == 0).collect();
    if let Some(i) = rng.index(fresh.len()) {
        return Ok(fresh[i]);
    }

    let weights: Vec<f64> = students.iter().map(|s| pick_weight(s) as f64).collect();
    let index = rng
        .weighted_index(&weights)
        .or_else(|| rng.index(students.len()))
        .ok_or_else(|| Error::not_found("students to pick from"))?;
    Ok(&students[index])
}
