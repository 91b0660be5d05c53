//! Account repository for async database operations.
//!
//! Every query is scoped by role so admins, faculty and students never
//! see each other's rows through the same call.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::identity::Role;
use crate::models::{Account, NewAccount, StudentIdentifiers, UpdateAccount};
use crate::repositories::AccountStore;
use crate::schema::accounts;

/// Optional list filters; `None` fields are ignored.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    pub course_id: Option<i32>,
    pub joining_year: Option<i32>,
    pub academic_year: Option<i32>,
    /// Matches `profile->>'batch'`
    pub batch: Option<String>,
    /// Matches `profile->>'semester'`
    pub semester: Option<i32>,
}

#[derive(Clone)]
pub struct AccountRepository {
    pool: AsyncDbPool,
}

impl AccountRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    fn filtered<'a>(
        account_role: Role,
        filter: &'a AccountFilter,
    ) -> accounts::BoxedQuery<'a, Pg> {
        use crate::schema::accounts::dsl::*;

        let mut query = accounts.filter(role.eq(account_role)).into_boxed();
        if let Some(cid) = filter.course_id {
            query = query.filter(course_id.eq(cid));
        }
        if let Some(year) = filter.joining_year {
            query = query.filter(joining_year.eq(year));
        }
        if let Some(year) = filter.academic_year {
            query = query.filter(academic_year.eq(year));
        }
        if let Some(b) = filter.batch.as_deref() {
            query = query.filter(profile.retrieve_as_text("batch").eq(b));
        }
        if let Some(s) = filter.semester {
            // `->>` yields the JSON number as text
            query = query.filter(profile.retrieve_as_text("semester").eq(s.to_string()));
        }
        query
    }

    pub async fn find_by_id(&self, account_id: i32) -> AppResult<Option<Account>> {
        use crate::schema::accounts::dsl::*;
        let mut conn = self.pool.get().await?;

        accounts
            .filter(id.eq(account_id))
            .select(Account::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Finds an account of `account_role` whose username or email equals
    /// `identifier`.
    pub async fn find_by_login(
        &self,
        account_role: Role,
        identifier: &str,
    ) -> AppResult<Option<Account>> {
        use crate::schema::accounts::dsl::*;
        let mut conn = self.pool.get().await?;

        accounts
            .filter(role.eq(account_role))
            .filter(username.eq(identifier).or(email.eq(identifier)))
            .select(Account::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Paginated list.
    ///
    /// # Returns
    /// Tuple of (accounts, total matching count)
    pub async fn list(
        &self,
        account_role: Role,
        filter: &AccountFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Account>, i64)> {
        use crate::schema::accounts::dsl::*;
        let mut conn = self.pool.get().await?;

        let rows = Self::filtered(account_role, filter)
            .order(username.asc())
            .offset(offset)
            .limit(limit)
            .select(Account::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)?;

        let total = Self::filtered(account_role, filter)
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(AppError::from)?;

        Ok((rows, total))
    }

    pub async fn update(&self, account_id: i32, update_data: UpdateAccount) -> AppResult<Account> {
        use crate::schema::accounts::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(accounts.filter(id.eq(account_id)))
            .set(&update_data)
            .returning(Account::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Deletes the accounts of `account_role` among `ids`.
    ///
    /// # Returns
    /// The number of deleted rows
    pub async fn delete_many(&self, account_role: Role, ids: &[i32]) -> AppResult<usize> {
        use crate::schema::accounts::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::delete(accounts.filter(role.eq(account_role)).filter(id.eq_any(ids)))
            .execute(&mut conn)
            .await
            .map_err(AppError::from)
    }
}

#[async_trait]
impl AccountStore for AccountRepository {
    async fn count_by_course(&self, account_role: Role, cid: i32) -> AppResult<u64> {
        use crate::schema::accounts::dsl::*;
        let mut conn = self.pool.get().await?;

        let total: i64 = accounts
            .filter(role.eq(account_role))
            .filter(course_id.eq(cid))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)?;
        Ok(total.max(0) as u64)
    }

    async fn insert(&self, new_account: NewAccount) -> AppResult<Account> {
        use crate::schema::accounts::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(accounts)
            .values(&new_account)
            .returning(Account::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn find_by_email(
        &self,
        account_role: Role,
        account_email: &str,
    ) -> AppResult<Option<Account>> {
        use crate::schema::accounts::dsl::*;
        let mut conn = self.pool.get().await?;

        accounts
            .filter(role.eq(account_role))
            .filter(email.eq(account_email))
            .select(Account::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn find_student_by_identifiers(
        &self,
        identifiers: &StudentIdentifiers,
    ) -> AppResult<Option<Account>> {
        use crate::schema::accounts::dsl::*;
        let mut conn = self.pool.get().await?;

        // A NULL bind never compares equal, so absent identifiers match nothing.
        accounts
            .filter(role.eq(Role::Student))
            .filter(
                email
                    .eq(identifiers.email.clone())
                    .or(contact_number.eq(identifiers.contact_number.clone()))
                    .or(profile
                        .retrieve_as_text("college_id")
                        .nullable()
                        .eq(identifiers.college_id.clone()))
                    .or(profile
                        .retrieve_as_text("university_roll_no")
                        .nullable()
                        .eq(identifiers.university_roll_no.clone()))
                    .or(profile
                        .retrieve_as_text("university_enrollment_no")
                        .nullable()
                        .eq(identifiers.university_enrollment_no.clone())),
            )
            .select(Account::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn find_student_ids(&self, cid: i32, year: i32) -> AppResult<Vec<i32>> {
        use crate::schema::accounts::dsl::*;
        let mut conn = self.pool.get().await?;

        accounts
            .filter(role.eq(Role::Student))
            .filter(course_id.eq(cid))
            .filter(academic_year.eq(year))
            .select(id)
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }
}
