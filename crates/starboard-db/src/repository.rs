//! `Repository` implementation over the native_db store.

use crate::store::Store;
use starboard_core::{
    CardId, ItemCard, ItemId, NewCard, NewStudent, Repository, Result, Student, StudentId,
    StudentItem, Tenant, TenantId,
};

impl Repository for Store {
    fn upgrade_schema(&self) -> Result<bool> {
        Ok(self.upgrade()?)
    }

    fn tenant(&self, id: TenantId) -> Result<Option<Tenant>> {
        Ok(self.load_tenant(id)?)
    }

    fn tenant_by_name(&self, username: &str) -> Result<Option<Tenant>> {
        Ok(self.load_tenant_by_name(username)?)
    }

    fn tenants(&self) -> Result<Vec<Tenant>> {
        Ok(self.load_tenants()?)
    }

    fn insert_tenant(&self, username: &str, is_admin: bool) -> Result<Tenant> {
        Ok(Store::insert_tenant(self, username, is_admin)?)
    }

    fn delete_tenant(&self, id: TenantId) -> Result<bool> {
        Ok(Store::delete_tenant(self, id)?)
    }

    fn student(&self, id: StudentId) -> Result<Option<Student>> {
        Ok(self.load_student(id)?)
    }

    fn students(&self, owner: TenantId) -> Result<Vec<Student>> {
        Ok(self.load_students(owner)?)
    }

    fn save_student(&self, student: &Student) -> Result<()> {
        Ok(Store::save_student(self, student)?)
    }

    fn save_students(&self, students: &[Student]) -> Result<()> {
        Ok(Store::save_students(self, students)?)
    }

    fn delete_student(&self, id: StudentId) -> Result<bool> {
        Ok(Store::delete_student(self, id)?)
    }

    fn replace_roster(&self, owner: TenantId, roster: &[NewStudent]) -> Result<Vec<Student>> {
        Ok(Store::replace_roster(self, owner, roster)?)
    }

    fn cards(&self) -> Result<Vec<ItemCard>> {
        Ok(self.load_cards()?)
    }

    fn insert_card(&self, card: NewCard) -> Result<ItemCard> {
        Ok(Store::insert_card(self, card)?)
    }

    fn save_card(&self, card: &ItemCard) -> Result<()> {
        Ok(Store::save_card(self, card)?)
    }

    fn insert_student_item(&self, student: StudentId, card: CardId) -> Result<StudentItem> {
        Ok(Store::insert_student_item(self, student, card)?)
    }

    fn record_draw(
        &self,
        student: StudentId,
        card: CardId,
        changed: &[Student],
    ) -> Result<StudentItem> {
        Ok(Store::record_draw(self, student, card, changed)?)
    }

    fn student_items(&self, student: StudentId) -> Result<Vec<StudentItem>> {
        Ok(self.load_student_items(student)?)
    }

    fn student_item(&self, id: ItemId) -> Result<Option<StudentItem>> {
        Ok(self.load_student_item(id)?)
    }

    fn delete_student_item(&self, id: ItemId) -> Result<bool> {
        Ok(Store::delete_student_item(self, id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starboard_core::{Error, PoolType};

    #[test]
    fn test_errors_map_to_core() {
        let store = Store::in_memory().unwrap();
        let repo: &dyn Repository = &store;
        repo.insert_tenant("admin", true).unwrap();
        assert!(matches!(
            repo.insert_tenant("admin", false),
            Err(Error::Conflict(_))
        ));

        let ghost = NewCard::new("Ghost", PoolType::Normal).into_card(CardId::new(9));
        assert!(matches!(repo.save_card(&ghost), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_record_draw_writes_item_and_students() {
        let store = Store::in_memory().unwrap();
        let repo: &dyn Repository = &store;
        let tenant = repo.insert_tenant("t", false).unwrap();
        let roster = [NewStudent {
            name: "Alice".to_string(),
            dorm_number: None,
        }];
        let mut alice = repo.replace_roster(tenant.id, &roster).unwrap().remove(0);
        let card = repo.insert_card(NewCard::new("Bard", PoolType::Normal)).unwrap();

        alice.stars = 3;
        let item = repo.record_draw(alice.id, card.id, &[alice.clone()]).unwrap();
        assert_eq!(repo.student_items(alice.id).unwrap(), vec![item]);
        assert_eq!(repo.student(alice.id).unwrap().unwrap().stars, 3);
    }
}
