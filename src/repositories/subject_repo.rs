//! Subject and enrollment repository.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Enrollment, NewSubject, Subject};
use crate::repositories::{EnrollmentStore, SubjectStore};
use crate::schema::subjects;

#[derive(Debug, Clone, Default)]
pub struct SubjectFilter {
    pub course_id: Option<i32>,
    pub year: Option<i32>,
    pub semester: Option<i32>,
    pub subject_type: Option<String>,
}

#[derive(Clone)]
pub struct SubjectRepository {
    pool: AsyncDbPool,
}

impl SubjectRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    fn filtered<'a>(filter: &'a SubjectFilter) -> subjects::BoxedQuery<'a, Pg> {
        use crate::schema::subjects::dsl::*;

        let mut query = subjects.into_boxed();
        if let Some(cid) = filter.course_id {
            query = query.filter(course_id.eq(cid));
        }
        if let Some(y) = filter.year {
            query = query.filter(year.eq(y));
        }
        if let Some(s) = filter.semester {
            query = query.filter(semester.eq(s));
        }
        if let Some(t) = filter.subject_type.as_deref() {
            query = query.filter(subject_type.eq(t));
        }
        query
    }

    pub async fn find_ids_by_course_year(&self, cid: i32, y: i32) -> AppResult<Vec<i32>> {
        use crate::schema::subjects::dsl::*;
        let mut conn = self.pool.get().await?;

        subjects
            .filter(course_id.eq(cid))
            .filter(year.eq(y))
            .select(id)
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }
}

#[async_trait]
impl SubjectStore for SubjectRepository {
    async fn insert(&self, new_subject: NewSubject) -> AppResult<Subject> {
        use crate::schema::subjects::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(subjects)
            .values(&new_subject)
            .returning(Subject::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn list(&self, filter: &SubjectFilter) -> AppResult<Vec<Subject>> {
        use crate::schema::subjects::dsl::*;
        let mut conn = self.pool.get().await?;

        Self::filtered(filter)
            .order(subject_code.asc())
            .select(Subject::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn delete_many(&self, ids: &[i32]) -> AppResult<usize> {
        use crate::schema::subjects::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::delete(subjects.filter(id.eq_any(ids)))
            .execute(&mut conn)
            .await
            .map_err(AppError::from)
    }
}

#[async_trait]
impl EnrollmentStore for SubjectRepository {
    async fn enroll(&self, links: &[Enrollment]) -> AppResult<usize> {
        use crate::schema::enrollments::dsl::*;
        if links.is_empty() {
            return Ok(0);
        }
        let mut conn = self.pool.get().await?;

        diesel::insert_into(enrollments)
            .values(links)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn enroll_in_matching_subjects(
        &self,
        account_id: i32,
        course_id: i32,
        academic_year: i32,
    ) -> AppResult<usize> {
        let links: Vec<Enrollment> = self
            .find_ids_by_course_year(course_id, academic_year)
            .await?
            .into_iter()
            .map(|subject_id| Enrollment {
                account_id,
                subject_id,
            })
            .collect();
        self.enroll(&links).await
    }
}
