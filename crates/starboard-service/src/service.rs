//! Request-level operations
//!
//! [`Service`] owns the repository, the shared random source and the special
//! card table. Every public method is one request: it checks tenant
//! ownership, runs the engine and persists the rows that changed.

use crate::config::ServiceConfig;
use crate::error::Result;
use crate::reconcile::{reconcile, ReconcileReport};
use serde::{Deserialize, Serialize};
use starboard_core::{
    classify, draw, pick_student, resolve, CardEffect, Error, GameRng, ItemCard, ItemId, Ledger,
    PoolType, RandomSource, Repository, Resolution, RosterImport, RosterRow, RosterStats,
    Student, StudentId, StudentItem, StudentUpdate, Tenant, TenantId,
};
use starboard_db::Store;
use starboard_script::{CardTable, Loader};
use std::sync::{Mutex, MutexGuard, PoisonError};

type SharedRng = Box<dyn RandomSource + Send>;

/// Result of one draw request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawOutcome {
    pub card: ItemCard,
    /// The inventory row recorded for the draw, card joined in
    pub item: StudentItem,
    pub resolution: Resolution,
    /// Student rows the effect changed, as persisted
    pub changed: Vec<Student>,
}

/// What startup did; every step is best effort
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StartupReport {
    pub upgraded: bool,
    pub catalog: Option<ReconcileReport>,
    /// The admin tenant, if it was created by this startup
    pub seeded_admin: Option<Tenant>,
}

/// Classroom reward service over a repository
pub struct Service<R> {
    repo: R,
    rng: Mutex<SharedRng>,
    table: CardTable,
    admin_username: String,
}

impl Service<Store> {
    /// Open the store named by the config and build a service over it.
    pub fn open(config: &ServiceConfig) -> Result<Self> {
        let store = match &config.database {
            Some(path) => Store::open(path)?,
            None => Store::in_memory()?,
        };
        Self::new(store, config)
    }
}

impl<R: Repository> Service<R> {
    pub fn new(repo: R, config: &ServiceConfig) -> Result<Self> {
        let table = match &config.catalog_path {
            Some(path) => {
                let mut loader = Loader::new();
                loader.load_file(path)?;
                loader.finish()
            }
            None => CardTable::embedded()?,
        };
        let rng = config
            .rng_seed
            .map(GameRng::new)
            .unwrap_or_else(GameRng::from_entropy);
        Ok(Self {
            repo,
            rng: Mutex::new(Box::new(rng)),
            table,
            admin_username: config.admin_username.clone(),
        })
    }

    /// Replace the random source
    pub fn with_rng(mut self, rng: impl RandomSource + Send + 'static) -> Self {
        self.rng = Mutex::new(Box::new(rng));
        self
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn card_table(&self) -> &CardTable {
        &self.table
    }

    fn rng(&self) -> MutexGuard<'_, SharedRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Upgrade the schema, reconcile the catalog and seed the admin tenant.
    ///
    /// Failures are logged and do not stop the remaining steps.
    pub fn startup(&self) -> StartupReport {
        let mut report = StartupReport::default();

        match self.repo.upgrade_schema() {
            Ok(upgraded) => report.upgraded = upgraded,
            Err(err) => tracing::warn!(error = %err, "schema upgrade failed"),
        }

        match reconcile(&self.repo, &self.table) {
            Ok(catalog) => {
                tracing::info!(
                    inserted = catalog.inserted,
                    patched = catalog.patched,
                    failed = catalog.failed,
                    "reconciled card catalog"
                );
                report.catalog = Some(catalog);
            }
            Err(err) => tracing::warn!(error = %err, "catalog reconciliation failed"),
        }

        match self.seed_admin() {
            Ok(seeded) => report.seeded_admin = seeded,
            Err(err) => tracing::warn!(error = %err, "admin seeding failed"),
        }

        report
    }

    fn seed_admin(&self) -> starboard_core::Result<Option<Tenant>> {
        match self.repo.tenant_by_name(&self.admin_username)? {
            Some(existing) => {
                if !existing.is_admin {
                    tracing::warn!(
                        username = %existing.username,
                        "configured admin exists without admin rights"
                    );
                }
                Ok(None)
            }
            None => {
                let admin = self.repo.insert_tenant(&self.admin_username, true)?;
                tracing::info!(username = %admin.username, "seeded admin tenant");
                Ok(Some(admin))
            }
        }
    }

    // Draw pipeline

    /// Draw a card for a student, record it and apply its effect.
    pub fn draw_item(
        &self,
        tenant: TenantId,
        student: StudentId,
        pool: PoolType,
    ) -> Result<DrawOutcome> {
        let acting = self.owned_student(tenant, student)?;
        let catalog = self.repo.cards()?;
        let candidates = classify(&catalog, pool)?;
        let roster = self.repo.students(acting.owner_id)?;

        let (card, resolution) = {
            let mut rng = self.rng();
            let card = draw(&candidates, &mut **rng)?.clone();
            let effect = CardEffect::from_name(&card.name);
            let resolution = resolve(effect, acting.id, &roster, &mut **rng);
            (card, resolution)
        };
        tracing::debug!(student = %acting.id, card = %card.name, %pool, "drew card");

        let mut ledger = Ledger::new(roster);
        ledger.apply_all(&resolution.mutations);
        let changed = ledger.changed();
        let mut item = self.repo.record_draw(acting.id, card.id, &changed)?;
        item.item_card = Some(card.clone());
        tracing::debug!(
            effect = ?resolution.effect,
            mutations = resolution.mutations.len(),
            changed = changed.len(),
            "resolved card effect"
        );

        Ok(DrawOutcome {
            card,
            item,
            resolution,
            changed,
        })
    }

    /// End a turn: every immunity counter of the tenant drops by one.
    pub fn advance_turn(&self, tenant: TenantId) -> Result<usize> {
        self.require_tenant(tenant)?;
        let mut ledger = Ledger::new(self.repo.students(tenant)?);
        let ticked = ledger.advance_turn();
        self.repo.save_students(&ledger.changed())?;
        tracing::debug!(%tenant, ticked, "advanced turn");
        Ok(ticked)
    }

    // Roster

    /// Replace the tenant's roster with the parsed rows.
    ///
    /// Returns the number of students created.
    pub fn import_roster(&self, tenant: TenantId, rows: &[RosterRow]) -> Result<usize> {
        self.require_tenant(tenant)?;
        let import = RosterImport::from_rows(rows);
        let students = self.repo.replace_roster(tenant, &import.students)?;
        tracing::info!(
            %tenant,
            imported = students.len(),
            skipped = import.skipped,
            header = import.had_header,
            "imported roster"
        );
        Ok(students.len())
    }

    pub fn students(&self, tenant: TenantId) -> Result<Vec<Student>> {
        self.require_tenant(tenant)?;
        Ok(self.repo.students(tenant)?)
    }

    /// Overwrite a student's editable fields.
    pub fn update_student(
        &self,
        tenant: TenantId,
        id: StudentId,
        mut update: StudentUpdate,
    ) -> Result<Student> {
        let mut student = self.owned_student(tenant, id)?;
        update.name = update.name.trim().to_string();
        if update.name.is_empty() {
            return Err(Error::InvalidInput("student name is empty".to_string()).into());
        }
        student.apply_update(update);
        self.repo.save_student(&student)?;
        Ok(student)
    }

    pub fn set_immunity(&self, tenant: TenantId, id: StudentId, turns: u32) -> Result<Student> {
        let mut student = self.owned_student(tenant, id)?;
        student.immunity = turns;
        self.repo.save_student(&student)?;
        Ok(student)
    }

    /// Add or remove stars by hand; the usual floor applies.
    pub fn adjust_stars(&self, tenant: TenantId, id: StudentId, delta: i64) -> Result<Student> {
        let mut student = self.owned_student(tenant, id)?;
        student.adjust_stars(delta);
        self.repo.save_student(&student)?;
        Ok(student)
    }

    pub fn delete_student(&self, tenant: TenantId, id: StudentId) -> Result<()> {
        self.owned_student(tenant, id)?;
        self.repo.delete_student(id)?;
        Ok(())
    }

    /// Choose the next student to call on.
    pub fn pick_student(&self, tenant: TenantId) -> Result<Student> {
        let roster = self.students(tenant)?;
        let mut rng = self.rng();
        Ok(pick_student(&roster, &mut **rng)?.clone())
    }

    /// Count a pick and award stars for the answer.
    pub fn record_answer(&self, tenant: TenantId, id: StudentId, delta: i64) -> Result<Student> {
        let student = self.owned_student(tenant, id)?;
        let mut ledger = Ledger::new([student]);
        let student = ledger.record_answer(id, delta)?.clone();
        self.repo.save_student(&student)?;
        Ok(student)
    }

    pub fn roster_stats(&self, tenant: TenantId) -> Result<RosterStats> {
        Ok(RosterStats::from_students(&self.students(tenant)?))
    }

    // Catalog and inventory

    /// The whole card catalog
    pub fn items(&self) -> Result<Vec<ItemCard>> {
        Ok(self.repo.cards()?)
    }

    /// A student's inventory with card rows joined, oldest first.
    pub fn student_items(&self, tenant: TenantId, id: StudentId) -> Result<Vec<StudentItem>> {
        self.owned_student(tenant, id)?;
        let catalog = self.repo.cards()?;
        let mut items = self.repo.student_items(id)?;
        for item in &mut items {
            item.item_card = catalog.iter().find(|c| c.id == item.item_card_id).cloned();
        }
        items.sort_by_key(|i| (i.created_at, i.id));
        Ok(items)
    }

    /// Spend an inventory item.
    pub fn use_item(&self, tenant: TenantId, id: ItemId) -> Result<()> {
        let item = self
            .repo
            .student_item(id)?
            .ok_or_else(|| Error::not_found(id))?;
        self.owned_student(tenant, item.student_id)
            .map_err(|err| match err {
                Error::NotFound(_) => Error::not_found(id),
                other => other,
            })?;
        self.repo.delete_student_item(id)?;
        Ok(())
    }

    // Tenants

    pub fn register_tenant(&self, username: &str) -> Result<Tenant> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::InvalidInput("username is empty".to_string()).into());
        }
        let tenant = self.repo.insert_tenant(username, false)?;
        tracing::info!(username = %tenant.username, id = %tenant.id, "registered tenant");
        Ok(tenant)
    }

    /// Every tenant; admin only.
    pub fn tenants(&self, admin: TenantId) -> Result<Vec<Tenant>> {
        self.require_admin(admin)?;
        Ok(self.repo.tenants()?)
    }

    /// Delete a tenant with its roster and inventory; admin only.
    ///
    /// Admin tenants can never be deleted.
    pub fn delete_tenant(&self, admin: TenantId, target: TenantId) -> Result<()> {
        self.require_admin(admin)?;
        let target = self.require_tenant(target)?;
        if target.is_admin {
            return Err(Error::Forbidden(format!("cannot delete admin {}", target.username)).into());
        }
        self.repo.delete_tenant(target.id)?;
        tracing::info!(username = %target.username, "deleted tenant");
        Ok(())
    }

    // Ownership checks

    fn require_tenant(&self, id: TenantId) -> starboard_core::Result<Tenant> {
        self.repo.tenant(id)?.ok_or_else(|| Error::not_found(id))
    }

    fn require_admin(&self, id: TenantId) -> starboard_core::Result<Tenant> {
        let tenant = self.require_tenant(id)?;
        if !tenant.is_admin {
            return Err(Error::Forbidden(format!("{} is not an admin", tenant.username)));
        }
        Ok(tenant)
    }

    /// The student, if it belongs to `tenant`; another tenant's student is
    /// reported as missing.
    fn owned_student(&self, tenant: TenantId, id: StudentId) -> starboard_core::Result<Student> {
        match self.repo.student(id)? {
            Some(student) if student.owner_id == tenant => Ok(student),
            _ => Err(Error::not_found(id)),
        }
    }
}
