//! Customer operations: plain single-entity persistence with uniqueness
//! checks, plus the paginated listing.

use tracing::info;

use crate::dto::{CreateCustomerDto, UpdateCustomerDto};
use crate::error::SvcError;
use mesa_core::{validation, CoreError, Customer, CustomerProfile, PageMeta, Paginated, Pagination};
use mesa_db::Database;

/// Customer operations exposed to the handler layer.
#[derive(Debug, Clone)]
pub struct CustomersService {
    db: Database,
}

impl CustomersService {
    /// Creates a new CustomersService.
    pub fn new(db: Database) -> Self {
        CustomersService { db }
    }

    /// Creates a customer with their address and an empty cart.
    ///
    /// ## Errors
    /// `Conflict` when the email is already registered.
    pub async fn create_customer(
        &self,
        dto: &CreateCustomerDto,
    ) -> Result<CustomerProfile, SvcError> {
        validation::validate_customer_id(&dto.id)?;
        validation::validate_email(&dto.email)?;
        validation::validate_address(&dto.address.as_input())?;

        if self.db.customers().find_by_email(&dto.email).await?.is_some() {
            return Err(CoreError::EmailTaken(dto.email.clone()).into());
        }

        // The UNIQUE constraint backs this up if a concurrent create with
        // the same email slips between the check and the insert
        let profile = self
            .db
            .customers()
            .create(&dto.id, &dto.email, dto.address.as_new())
            .await
            .map_err(|err| match err {
                mesa_db::DbError::UniqueViolation { .. } => {
                    CoreError::EmailTaken(dto.email.clone()).into()
                }
                other => SvcError::from(other),
            })?;

        info!(id = %dto.id, "Customer created");
        Ok(profile)
    }

    /// Lists one page of customers with paging metadata.
    ///
    /// ## Errors
    /// `NotFound` when no customers exist at all.
    pub async fn find_all_customers(
        &self,
        pagination: Pagination,
    ) -> Result<Paginated<Customer>, SvcError> {
        let total = self.db.customers().count().await?;
        if total == 0 {
            return Err(CoreError::NoCustomers.into());
        }

        let data = self.db.customers().list(pagination).await?;

        Ok(Paginated {
            data,
            meta: PageMeta::new(total, pagination),
        })
    }

    /// Gets a customer with their address.
    pub async fn find_one_customer(&self, id: &str) -> Result<CustomerProfile, SvcError> {
        validation::validate_customer_id(id)?;

        self.db
            .customers()
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::CustomerNotFound(id.to_string()).into())
    }

    /// Gets a customer by email.
    pub async fn find_one_customer_by_email(&self, email: &str) -> Result<Customer, SvcError> {
        validation::validate_email(email)?;

        self.db
            .customers()
            .find_by_email(email)
            .await?
            .ok_or_else(|| CoreError::CustomerEmailNotFound(email.to_string()).into())
    }

    /// Replaces a customer's address.
    pub async fn update_customer(
        &self,
        dto: &UpdateCustomerDto,
    ) -> Result<CustomerProfile, SvcError> {
        validation::validate_customer_id(&dto.id)?;
        validation::validate_address(&dto.address.as_input())?;

        // Fails fast before the write when the customer is absent
        self.find_one_customer(&dto.id).await?;

        info!(id = %dto.id, "Updating customer");

        self.db
            .customers()
            .update_address(&dto.id, dto.address.as_new())
            .await?;

        self.find_one_customer(&dto.id).await
    }

    /// Deletes a customer; their cart and its items cascade away.
    pub async fn delete_customer(&self, id: &str) -> Result<Customer, SvcError> {
        let profile = self.find_one_customer(id).await?;

        self.db.customers().delete(id).await?;

        info!(id = %id, "Customer deleted");
        Ok(profile.customer)
    }

    #[cfg(test)]
    pub(crate) fn db(&self) -> &Database {
        &self.db
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::AddressDto;
    use mesa_db::DbConfig;
    use uuid::Uuid;

    fn sample_address() -> AddressDto {
        AddressDto {
            street: "Gran Via".to_string(),
            street_number: Some(12),
            city: "Madrid".to_string(),
            province: "Madrid".to_string(),
            zip_code: "28013".to_string(),
            additional_info: None,
        }
    }

    async fn service() -> CustomersService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        CustomersService::new(db)
    }

    fn create_dto(email: &str) -> CreateCustomerDto {
        CreateCustomerDto {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            address: sample_address(),
        }
    }

    #[tokio::test]
    async fn test_create_then_find() {
        let svc = service().await;

        let dto = create_dto("ana@example.com");
        let created = svc.create_customer(&dto).await.unwrap();
        assert_eq!(created.customer.id, dto.id);

        let found = svc.find_one_customer(&dto.id).await.unwrap();
        assert_eq!(found.customer.email, "ana@example.com");

        let by_email = svc
            .find_one_customer_by_email("ana@example.com")
            .await
            .unwrap();
        assert_eq!(by_email.id, dto.id);
    }

    #[tokio::test]
    async fn test_create_gives_the_customer_a_cart() {
        let svc = service().await;

        let dto = create_dto("with-cart@example.com");
        svc.create_customer(&dto).await.unwrap();

        let cart = svc.db().carts().find_by_customer(&dto.id).await.unwrap();
        assert!(cart.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let svc = service().await;

        svc.create_customer(&create_dto("dup@example.com"))
            .await
            .unwrap();

        let err = svc
            .create_customer(&create_dto("dup@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), 409);
        assert_eq!(
            err.to_string(),
            "Customer with email dup@example.com already exists"
        );
    }

    #[tokio::test]
    async fn test_find_all_errors_when_empty() {
        let svc = service().await;

        let err = svc
            .find_all_customers(Pagination::default())
            .await
            .unwrap_err();
        assert_eq!(err.status(), 404);
        assert_eq!(err.to_string(), "No customers found.");
    }

    #[tokio::test]
    async fn test_find_all_pagination_meta() {
        let svc = service().await;

        for i in 0..5 {
            svc.create_customer(&create_dto(&format!("c{i}@example.com")))
                .await
                .unwrap();
        }

        let page = svc
            .find_all_customers(Pagination { page: 2, limit: 2 })
            .await
            .unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.meta.total, 5);
        assert_eq!(page.meta.page, 2);
        assert_eq!(page.meta.last_page, 3);
    }

    #[tokio::test]
    async fn test_update_replaces_address() {
        let svc = service().await;

        let dto = create_dto("move@example.com");
        svc.create_customer(&dto).await.unwrap();

        let mut address = sample_address();
        address.city = "Barcelona".to_string();
        address.zip_code = "08019".to_string();

        let updated = svc
            .update_customer(&UpdateCustomerDto {
                id: dto.id.clone(),
                address,
            })
            .await
            .unwrap();
        assert_eq!(updated.address.city, "Barcelona");
    }

    #[tokio::test]
    async fn test_update_unknown_customer_is_not_found() {
        let svc = service().await;
        let ghost = Uuid::new_v4().to_string();

        let err = svc
            .update_customer(&UpdateCustomerDto {
                id: ghost.clone(),
                address: sample_address(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), format!("Customer #{ghost} not found"));
    }

    #[tokio::test]
    async fn test_delete_removes_customer_and_cart() {
        let svc = service().await;

        let dto = create_dto("gone@example.com");
        svc.create_customer(&dto).await.unwrap();
        svc.delete_customer(&dto.id).await.unwrap();

        let err = svc.find_one_customer(&dto.id).await.unwrap_err();
        assert_eq!(err.status(), 404);

        assert!(svc
            .db()
            .carts()
            .find_by_customer(&dto.id)
            .await
            .unwrap()
            .is_none());
    }
}
