//! Database store wrapper.

use crate::error::{Error, Result};
use crate::models::*;
use native_db::transaction::RwTransaction;
use native_db::*;
use starboard_core::{
    CardId, ItemCard, ItemId, NewCard, NewStudent, Student, StudentId, StudentItem, Tenant,
    TenantId,
};
use std::path::Path;
use std::sync::LazyLock;

pub(crate) const STUDENTS: &str = "students";
pub(crate) const CARDS: &str = "item_cards";
pub(crate) const ITEMS: &str = "student_items";
pub(crate) const TENANTS: &str = "tenants";

// Static models for the database
static MODELS: LazyLock<Models> = LazyLock::new(|| {
    let mut models = Models::new();
    models.define::<StoredTenant>().unwrap();
    models.define::<v1::StoredStudent>().unwrap();
    models.define::<StoredStudent>().unwrap();
    models.define::<v1::StoredItemCard>().unwrap();
    models.define::<StoredItemCard>().unwrap();
    models.define::<StoredStudentItem>().unwrap();
    models.define::<StoredSequence>().unwrap();
    models.define::<StoredSchemaVersion>().unwrap();
    models
});

/// Database store for tenants, rosters, the card catalog and inventory.
pub struct Store {
    pub(crate) db: Database<'static>,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Builder::new()
            .create(&MODELS, path.as_ref())
            .map_err(|e| Error::Database(e.to_string()))?;
        tracing::info!(path = %path.as_ref().display(), "opened database");
        Ok(Self { db })
    }

    /// Create an in-memory database.
    pub fn in_memory() -> Result<Self> {
        let db = Builder::new()
            .create_in_memory(&MODELS)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self { db })
    }

    /// Create a tenant. Usernames are unique.
    pub fn insert_tenant(&self, username: &str, is_admin: bool) -> Result<Tenant> {
        let rw = self.db.rw_transaction()?;
        let taken: Option<StoredTenant> = rw
            .get()
            .secondary(StoredTenantKey::username, username.to_string())?;
        if taken.is_some() {
            return Err(Error::DuplicateKey(format!("tenant {}", username)));
        }
        let stored = StoredTenant {
            id: next_id(&rw, TENANTS)?,
            username: username.to_string(),
            is_admin,
        };
        rw.insert(stored.clone())?;
        rw.commit()?;
        Ok(stored.to_tenant())
    }

    /// Delete a tenant with its students and their inventory.
    pub fn delete_tenant(&self, id: TenantId) -> Result<bool> {
        let rw = self.db.rw_transaction()?;
        let Some(tenant) = rw.get().primary::<StoredTenant>(id.raw())? else {
            return Ok(false);
        };
        let students = students_of(&rw, id.raw())?;
        for student in students {
            remove_student(&rw, student)?;
        }
        rw.remove(tenant)?;
        rw.commit()?;
        Ok(true)
    }

    /// Save a student row.
    pub fn save_student(&self, student: &Student) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        rw.upsert(StoredStudent::from_student(student))?;
        rw.commit()?;
        Ok(())
    }

    /// Save several student rows in one transaction.
    pub fn save_students(&self, students: &[Student]) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        for student in students {
            rw.upsert(StoredStudent::from_student(student))?;
        }
        rw.commit()?;
        Ok(())
    }

    /// Delete a student and its inventory.
    pub fn delete_student(&self, id: StudentId) -> Result<bool> {
        let rw = self.db.rw_transaction()?;
        let Some(student) = rw.get().primary::<StoredStudent>(id.raw())? else {
            return Ok(false);
        };
        remove_student(&rw, student)?;
        rw.commit()?;
        Ok(true)
    }

    /// Replace a tenant's roster.
    ///
    /// Existing students of the tenant and their inventory are removed in the
    /// same transaction that inserts the new rows.
    pub fn replace_roster(&self, owner: TenantId, roster: &[NewStudent]) -> Result<Vec<Student>> {
        let rw = self.db.rw_transaction()?;
        let removed = students_of(&rw, owner.raw())?;
        let count = removed.len();
        for student in removed {
            remove_student(&rw, student)?;
        }

        let mut inserted = Vec::with_capacity(roster.len());
        for new in roster {
            let id = StudentId::new(next_id(&rw, STUDENTS)?);
            let student = new.clone().into_student(id, owner);
            rw.insert(StoredStudent::from_student(&student))?;
            inserted.push(student);
        }
        rw.commit()?;
        tracing::info!(
            tenant = %owner,
            removed = count,
            inserted = inserted.len(),
            "replaced roster"
        );
        Ok(inserted)
    }

    /// Add a card to the catalog.
    pub fn insert_card(&self, card: NewCard) -> Result<ItemCard> {
        let rw = self.db.rw_transaction()?;
        let stored = StoredItemCard::from_new(next_id(&rw, CARDS)?, card);
        rw.insert(stored.clone())?;
        rw.commit()?;
        Ok(stored.to_card())
    }

    /// Overwrite an existing catalog card.
    pub fn save_card(&self, card: &ItemCard) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        if rw.get().primary::<StoredItemCard>(card.id.raw())?.is_none() {
            return Err(Error::NotFound(card.id.to_string()));
        }
        rw.upsert(StoredItemCard::from_card(card))?;
        rw.commit()?;
        Ok(())
    }

    /// Record a drawn card in a student's inventory.
    pub fn insert_student_item(&self, student: StudentId, card: CardId) -> Result<StudentItem> {
        let rw = self.db.rw_transaction()?;
        let item = add_item(&rw, student, card)?;
        rw.commit()?;
        Ok(item)
    }

    /// Record a drawn card and save the student rows its effect changed, in
    /// one transaction.
    ///
    /// Every changed row must still exist; otherwise nothing is written.
    pub fn record_draw(
        &self,
        student: StudentId,
        card: CardId,
        changed: &[Student],
    ) -> Result<StudentItem> {
        let rw = self.db.rw_transaction()?;
        let item = add_item(&rw, student, card)?;
        for row in changed {
            let current: Option<StoredStudent> = rw.get().primary(row.id.raw())?;
            if current.is_none() {
                return Err(Error::NotFound(row.id.to_string()));
            }
            rw.upsert(StoredStudent::from_student(row))?;
        }
        rw.commit()?;
        Ok(item)
    }

    /// Remove one inventory row.
    pub fn delete_student_item(&self, id: ItemId) -> Result<bool> {
        let rw = self.db.rw_transaction()?;
        let Some(item) = rw.get().primary::<StoredStudentItem>(id.raw())? else {
            return Ok(false);
        };
        rw.remove(item)?;
        rw.commit()?;
        Ok(true)
    }
}

/// Take the next ID of a table, starting at 1.
pub(crate) fn next_id(rw: &RwTransaction<'_>, table: &str) -> Result<u64> {
    let current: Option<StoredSequence> = rw.get().primary(table.to_string())?;
    let id = current.map(|s| s.next).unwrap_or(1);
    rw.upsert(StoredSequence {
        table: table.to_string(),
        next: id + 1,
    })?;
    Ok(id)
}

fn add_item(rw: &RwTransaction<'_>, student: StudentId, card: CardId) -> Result<StudentItem> {
    let stored = StoredStudentItem {
        id: next_id(rw, ITEMS)?,
        student_id: student.raw(),
        item_card_id: card.raw(),
        created_at: chrono::Utc::now().timestamp_millis(),
    };
    rw.insert(stored.clone())?;
    Ok(stored.to_item())
}

fn students_of(rw: &RwTransaction<'_>, owner: u64) -> Result<Vec<StoredStudent>> {
    let scan = rw
        .scan()
        .secondary::<StoredStudent>(StoredStudentKey::owner_id)?;
    let iter = scan.start_with(owner)?;
    let students: std::result::Result<Vec<StoredStudent>, _> = iter.collect();
    students.map_err(|e| Error::Database(e.to_string()))
}

fn items_of(rw: &RwTransaction<'_>, student: u64) -> Result<Vec<StoredStudentItem>> {
    let scan = rw
        .scan()
        .secondary::<StoredStudentItem>(StoredStudentItemKey::student_id)?;
    let iter = scan.start_with(student)?;
    let items: std::result::Result<Vec<StoredStudentItem>, _> = iter.collect();
    items.map_err(|e| Error::Database(e.to_string()))
}

fn remove_student(rw: &RwTransaction<'_>, student: StoredStudent) -> Result<()> {
    for item in items_of(rw, student.id)? {
        rw.remove(item)?;
    }
    rw.remove(student)?;
    Ok(())
}

impl From<native_db::db_type::Error> for Error {
    fn from(err: native_db::db_type::Error) -> Self {
        Error::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starboard_core::PoolType;

    fn roster(names: &[&str]) -> Vec<NewStudent> {
        names
            .iter()
            .map(|name| NewStudent {
                name: name.to_string(),
                dorm_number: Some("101".to_string()),
            })
            .collect()
    }

    #[test]
    fn test_ids_are_sequential_per_table() {
        let store = Store::in_memory().unwrap();
        let a = store.insert_card(NewCard::new("Bard", PoolType::Normal)).unwrap();
        let b = store.insert_card(NewCard::new("Dark Curse", PoolType::Negative)).unwrap();
        assert_eq!(a.id, CardId::new(1));
        assert_eq!(b.id, CardId::new(2));

        let tenant = store.insert_tenant("alice", false).unwrap();
        assert_eq!(tenant.id, TenantId::new(1));
    }

    #[test]
    fn test_duplicate_tenant() {
        let store = Store::in_memory().unwrap();
        store.insert_tenant("alice", false).unwrap();
        assert!(matches!(
            store.insert_tenant("alice", true),
            Err(Error::DuplicateKey(_))
        ));
    }

    #[test]
    fn test_replace_roster_is_scoped_to_tenant() {
        let store = Store::in_memory().unwrap();
        let t1 = store.insert_tenant("t1", false).unwrap();
        let t2 = store.insert_tenant("t2", false).unwrap();

        let first = store.replace_roster(t1.id, &roster(&["Alice", "Bob"])).unwrap();
        store.replace_roster(t2.id, &roster(&["Cara"])).unwrap();
        let card = store.insert_card(NewCard::new("Bard", PoolType::Normal)).unwrap();
        let item = store.insert_student_item(first[0].id, card.id).unwrap();

        let second = store.replace_roster(t1.id, &roster(&["Dan"])).unwrap();
        assert_eq!(second.len(), 1);

        let t1_students = store.load_students(t1.id).unwrap();
        assert_eq!(t1_students.len(), 1);
        assert_eq!(t1_students[0].name, "Dan");
        assert_eq!(store.load_students(t2.id).unwrap().len(), 1);
        assert!(store.load_student_item(item.id).unwrap().is_none());
    }

    #[test]
    fn test_delete_student_cascades_inventory() {
        let store = Store::in_memory().unwrap();
        let tenant = store.insert_tenant("t", false).unwrap();
        let students = store.replace_roster(tenant.id, &roster(&["Alice", "Bob"])).unwrap();
        let card = store.insert_card(NewCard::new("Bard", PoolType::Normal)).unwrap();
        store.insert_student_item(students[0].id, card.id).unwrap();
        let kept = store.insert_student_item(students[1].id, card.id).unwrap();

        assert!(store.delete_student(students[0].id).unwrap());
        assert!(!store.delete_student(students[0].id).unwrap());
        assert!(store.load_student_items(students[0].id).unwrap().is_empty());
        assert_eq!(store.load_student_items(students[1].id).unwrap(), vec![kept]);
    }

    #[test]
    fn test_delete_tenant_cascades() {
        let store = Store::in_memory().unwrap();
        let tenant = store.insert_tenant("t", false).unwrap();
        let students = store.replace_roster(tenant.id, &roster(&["Alice"])).unwrap();
        let card = store.insert_card(NewCard::new("Bard", PoolType::Normal)).unwrap();
        let item = store.insert_student_item(students[0].id, card.id).unwrap();

        assert!(store.delete_tenant(tenant.id).unwrap());
        assert!(store.load_tenant(tenant.id).unwrap().is_none());
        assert!(store.load_student(students[0].id).unwrap().is_none());
        assert!(store.load_student_item(item.id).unwrap().is_none());
        assert!(!store.delete_tenant(tenant.id).unwrap());
    }

    #[test]
    fn test_record_draw_is_all_or_nothing() {
        let store = Store::in_memory().unwrap();
        let tenant = store.insert_tenant("t", false).unwrap();
        let mut students = store.replace_roster(tenant.id, &roster(&["Alice", "Bob"])).unwrap();
        let card = store.insert_card(NewCard::new("Bard", PoolType::Normal)).unwrap();

        for student in &mut students {
            student.stars = 1;
        }
        let mut gone = students[1].clone();
        store.delete_student(gone.id).unwrap();
        gone.stars = 5;

        let changed = [students[0].clone(), gone];
        assert!(matches!(
            store.record_draw(students[0].id, card.id, &changed),
            Err(Error::NotFound(_))
        ));
        assert!(store.load_student_items(students[0].id).unwrap().is_empty());
        assert_eq!(store.load_student(students[0].id).unwrap().unwrap().stars, 0);
        assert!(store.load_student(students[1].id).unwrap().is_none());

        let item = store
            .record_draw(students[0].id, card.id, &students[..1])
            .unwrap();
        assert_eq!(store.load_student_items(students[0].id).unwrap(), vec![item]);
        assert_eq!(store.load_student(students[0].id).unwrap().unwrap().stars, 1);
    }

    #[test]
    fn test_save_card_requires_existing_row() {
        let store = Store::in_memory().unwrap();
        let mut card = store.insert_card(NewCard::new("Bard", PoolType::Normal)).unwrap();
        card.image_path = "11.jpg".to_string();
        store.save_card(&card).unwrap();
        assert_eq!(store.load_cards().unwrap()[0].image_path, "11.jpg");

        let ghost = NewCard::new("Ghost", PoolType::Normal).into_card(CardId::new(40));
        assert!(matches!(store.save_card(&ghost), Err(Error::NotFound(_))));
    }
}
