//! Student ledger
//!
//! An in-memory copy of one tenant's roster. Effect resolution reads it and
//! the service applies the resulting [`LedgerMutation`]s back onto it, then
//! persists only the rows that actually changed.

use crate::{Error, LedgerMutation, Mutation, Result, Student, StudentId};
use indexmap::{IndexMap, IndexSet};

/// Roster rows keyed by ID, in roster order
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    students: IndexMap<StudentId, Student>,
    /// Rows modified since the ledger was loaded
    changed: IndexSet<StudentId>,
}

impl Ledger {
    pub fn new(students: impl IntoIterator<Item = Student>) -> Self {
        Self {
            students: students.into_iter().map(|s| (s.id, s)).collect(),
            changed: IndexSet::new(),
        }
    }

    pub fn get(&self, id: StudentId) -> Option<&Student> {
        self.students.get(&id)
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Rows in roster order
    pub fn students(&self) -> Vec<Student> {
        self.students.values().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Student> {
        self.students.values()
    }

    /// Apply one mutation.
    ///
    /// Mutations naming a student outside the ledger are ignored. A row is
    /// only marked changed when its value differs afterwards.
    pub fn apply(&mut self, mutation: &LedgerMutation) {
        let Some(student) = self.students.get_mut(&mutation.student) else {
            return;
        };
        let before = student.clone();
        match mutation.mutation {
            Mutation::AdjustStars(delta) => student.adjust_stars(delta),
            Mutation::SetStars(stars) => {
                student.stars = if student.is_cursed { stars } else { stars.max(0) };
            }
            Mutation::SetCursed(cursed) => student.is_cursed = cursed,
            Mutation::SetImmunity(turns) => student.immunity = turns,
        }
        if *student != before {
            self.changed.insert(mutation.student);
        }
    }

    /// Apply mutations in order
    pub fn apply_all<'a>(&mut self, mutations: impl IntoIterator<Item = &'a LedgerMutation>) {
        for mutation in mutations {
            self.apply(mutation);
        }
    }

    /// Add stars to a student; the same floor applies as for card effects
    pub fn adjust_stars(&mut self, id: StudentId, delta: i64) -> Result<&Student> {
        if !self.students.contains_key(&id) {
            return Err(Error::not_found(id));
        }
        self.apply(&LedgerMutation::new(id, Mutation::AdjustStars(delta)));
        self.get(id).ok_or_else(|| Error::not_found(id))
    }

    /// Record a classroom answer: counts the pick and awards `delta` stars.
    pub fn record_answer(&mut self, id: StudentId, delta: i64) -> Result<&Student> {
        let student = self
            .students
            .get_mut(&id)
            .ok_or_else(|| Error::not_found(id))?;
        student.pick_count = student.pick_count.saturating_add(1);
        student.adjust_stars(delta);
        self.changed.insert(id);
        self.get(id).ok_or_else(|| Error::not_found(id))
    }

    /// Tick every immunity counter down by one turn.
    ///
    /// Returns the number of students whose counter changed.
    pub fn advance_turn(&mut self) -> usize {
        let mut ticked = 0;
        for student in self.students.values_mut() {
            if student.immunity > 0 {
                student.immunity -= 1;
                self.changed.insert(student.id);
                ticked += 1;
            }
        }
        ticked
    }

    /// Rows modified since load, in roster order
    pub fn changed(&self) -> Vec<Student> {
        self.students
            .values()
            .filter(|s| self.changed.contains(&s.id))
            .cloned()
            .collect()
    }

    pub fn has_changes(&self) -> bool {
        !self.changed.is_empty()
    }

    /// Forget change tracking, e.g. after the rows were persisted
    pub fn clear_changes(&mut self) {
        self.changed.clear();
    }
}
