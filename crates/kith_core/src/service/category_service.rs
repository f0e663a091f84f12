//! Category use-case service.

use super::{ServiceError, ServiceResult};
use crate::collection::CategoryCollection;
use crate::model::category::Category;
use crate::model::ids::CategoryId;
use crate::model::value::{CategoryName, CheckInFrequency, FrequencyUnit};
use crate::repo::{CategoryRepository, EntityKind};
use log::info;

pub struct CategoryService<R: CategoryRepository> {
    repo: R,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates raw input, persists the new category and returns it.
    pub fn create_category(
        &self,
        name: &str,
        frequency_value: i64,
        unit: FrequencyUnit,
    ) -> ServiceResult<Category> {
        let category = Category::new(
            CategoryName::new(name)?,
            CheckInFrequency::new(frequency_value, unit)?,
        )?;
        self.repo.save(&category)?;
        info!(
            "event=category_create module=service status=ok id={}",
            category.id()
        );
        Ok(category)
    }

    /// # Errors
    /// - `NotFound` when no category has `id`.
    pub fn get_category(&self, id: CategoryId) -> ServiceResult<Category> {
        self.repo
            .find_by_id(id)?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Category, id))
    }

    pub fn rename_category(&self, id: CategoryId, name: &str) -> ServiceResult<Category> {
        let renamed = self.get_category(id)?.rename(CategoryName::new(name)?)?;
        self.repo.save(&renamed)?;
        Ok(renamed)
    }

    pub fn update_frequency(
        &self,
        id: CategoryId,
        value: i64,
        unit: FrequencyUnit,
    ) -> ServiceResult<Category> {
        let updated = self
            .get_category(id)?
            .with_frequency(CheckInFrequency::new(value, unit)?)?;
        self.repo.save(&updated)?;
        Ok(updated)
    }

    pub fn list_categories(&self) -> ServiceResult<CategoryCollection> {
        Ok(self.repo.find_all()?)
    }

    /// Contacts pointing at the deleted category keep its id; callers decide
    /// whether to reassign them.
    pub fn delete_category(&self, id: CategoryId) -> ServiceResult<()> {
        self.repo.delete(id)?;
        info!("event=category_delete module=service status=ok id={id}");
        Ok(())
    }
}
