use std::path::Path;

use log::info;
use rusqlite::{params, Connection};

use crate::error::Result;
use crate::models::{CatalogEntry, Company, Difficulty, Problem, SolvedStatus, Topic};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS problems (
    question_id     INTEGER PRIMARY KEY,
    frontend_id     TEXT NOT NULL,
    title           TEXT NOT NULL,
    title_slug      TEXT NOT NULL UNIQUE,
    url             TEXT NOT NULL,
    difficulty      TEXT NOT NULL CHECK (difficulty IN ('Easy', 'Medium', 'Hard')),
    acceptance_rate REAL NOT NULL,
    frequency_bar   REAL,
    likes           INTEGER NOT NULL DEFAULT 0,
    dislikes        INTEGER NOT NULL DEFAULT 0,
    rating          REAL NOT NULL DEFAULT 0,
    paid_only       INTEGER NOT NULL DEFAULT 0,
    status          TEXT
);

CREATE TABLE IF NOT EXISTS topics (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    slug TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS companies (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    slug TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS problem_topics (
    problem_id INTEGER NOT NULL REFERENCES problems(question_id) ON DELETE CASCADE,
    topic_id   INTEGER NOT NULL REFERENCES topics(id) ON DELETE CASCADE,
    PRIMARY KEY (problem_id, topic_id)
);

CREATE TABLE IF NOT EXISTS problem_companies (
    problem_id INTEGER NOT NULL REFERENCES problems(question_id) ON DELETE CASCADE,
    company_id INTEGER NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    PRIMARY KEY (problem_id, company_id)
);
";

pub struct CatalogStore {
    conn: Connection,
}

impl CatalogStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = CatalogStore { conn };
        store.init_schema()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let store = CatalogStore {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Insert or refresh one problem with its topic and company tags.
    pub fn upsert_problem(
        &mut self,
        problem: &Problem,
        topics: &[Topic],
        companies: &[Company],
    ) -> Result<()> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO problems (
                question_id, frontend_id, title, title_slug, url, difficulty,
                acceptance_rate, frequency_bar, likes, dislikes, rating, paid_only, status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            ON CONFLICT(question_id) DO UPDATE SET
                frontend_id = excluded.frontend_id,
                title = excluded.title,
                title_slug = excluded.title_slug,
                url = excluded.url,
                difficulty = excluded.difficulty,
                acceptance_rate = excluded.acceptance_rate,
                frequency_bar = excluded.frequency_bar,
                likes = excluded.likes,
                dislikes = excluded.dislikes,
                rating = excluded.rating,
                paid_only = excluded.paid_only,
                status = excluded.status",
            params![
                problem.question_id,
                problem.frontend_id,
                problem.title,
                problem.slug,
                problem.url,
                problem.difficulty.as_str(),
                problem.acceptance_rate,
                problem.frequency,
                problem.likes,
                problem.dislikes,
                problem.rating,
                problem.paid_only,
                problem.status.to_db(),
            ],
        )?;

        for topic in topics {
            tx.execute(
                "INSERT OR IGNORE INTO topics (name, slug) VALUES (?1, ?2)",
                params![topic.name, topic.slug],
            )?;
            tx.execute(
                "INSERT OR IGNORE INTO problem_topics (problem_id, topic_id)
                 SELECT ?1, id FROM topics WHERE slug = ?2",
                params![problem.question_id, topic.slug],
            )?;
        }

        for company in companies {
            tx.execute(
                "INSERT OR IGNORE INTO companies (name, slug) VALUES (?1, ?2)",
                params![company.name, company.slug],
            )?;
            tx.execute(
                "INSERT OR IGNORE INTO problem_companies (problem_id, company_id)
                 SELECT ?1, id FROM companies WHERE slug = ?2",
                params![problem.question_id, company.slug],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Every problem with its joined topic and company names, ordered by
    /// question id so one scoring pass sees a stable sequence.
    pub fn load_catalog(&self) -> Result<Vec<CatalogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT question_id, frontend_id, title, title_slug, url, difficulty,
                    acceptance_rate, frequency_bar, likes, dislikes, rating, paid_only, status
             FROM problems ORDER BY question_id",
        )?;

        let problems: Vec<Problem> = stmt
            .query_map([], |row| {
                let difficulty: String = row.get(5)?;
                let status: Option<String> = row.get(12)?;
                Ok(Problem {
                    question_id: row.get(0)?,
                    frontend_id: row.get(1)?,
                    title: row.get(2)?,
                    slug: row.get(3)?,
                    url: row.get(4)?,
                    // The CHECK constraint keeps this parseable.
                    difficulty: difficulty.parse().unwrap_or(Difficulty::Medium),
                    acceptance_rate: row.get(6)?,
                    frequency: row.get(7)?,
                    likes: row.get(8)?,
                    dislikes: row.get(9)?,
                    rating: row.get(10)?,
                    paid_only: row.get(11)?,
                    status: SolvedStatus::from_db(status.as_deref()),
                })
            })?
            .collect::<rusqlite::Result<_>>()?;

        let mut topic_stmt = self.conn.prepare(
            "SELECT t.name FROM topics t
             JOIN problem_topics pt ON pt.topic_id = t.id
             WHERE pt.problem_id = ?1 ORDER BY t.name",
        )?;
        let mut company_stmt = self.conn.prepare(
            "SELECT c.name FROM companies c
             JOIN problem_companies pc ON pc.company_id = c.id
             WHERE pc.problem_id = ?1 ORDER BY c.name",
        )?;

        let mut entries = Vec::with_capacity(problems.len());
        for problem in problems {
            let topics: Vec<String> = topic_stmt
                .query_map([problem.question_id], |row| row.get(0))?
                .collect::<rusqlite::Result<_>>()?;
            let companies: Vec<String> = company_stmt
                .query_map([problem.question_id], |row| row.get(0))?
                .collect::<rusqlite::Result<_>>()?;
            entries.push(CatalogEntry {
                problem,
                topics,
                companies,
            });
        }

        info!("loaded {} problems from the catalog", entries.len());
        Ok(entries)
    }

    pub fn problem_count(&self) -> Result<u32> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM problems", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_problem(id: u32, slug: &str) -> Problem {
        Problem {
            question_id: id,
            frontend_id: id.to_string(),
            title: format!("Problem {}", id),
            slug: slug.to_string(),
            url: Problem::canonical_url(slug),
            difficulty: Difficulty::Medium,
            acceptance_rate: 47.5,
            frequency: Some(62.0),
            likes: 1200,
            dislikes: 80,
            rating: 1850.0,
            paid_only: false,
            status: SolvedStatus::Unsolved,
        }
    }

    fn topic(name: &str, slug: &str) -> Topic {
        Topic {
            name: name.to_string(),
            slug: slug.to_string(),
        }
    }

    fn company(name: &str, slug: &str) -> Company {
        Company {
            name: name.to_string(),
            slug: slug.to_string(),
        }
    }

    #[test]
    fn upsert_then_load_roundtrips() {
        let mut store = CatalogStore::open_in_memory().unwrap();
        store
            .upsert_problem(
                &sample_problem(1, "two-sum"),
                &[topic("Array", "array"), topic("Hash Table", "hash-table")],
                &[company("Google", "google")],
            )
            .unwrap();

        let catalog = store.load_catalog().unwrap();
        assert_eq!(catalog.len(), 1);
        let entry = &catalog[0];
        assert_eq!(entry.problem.slug, "two-sum");
        assert_eq!(entry.problem.frequency, Some(62.0));
        assert_eq!(entry.topics, vec!["Array", "Hash Table"]);
        assert_eq!(entry.companies, vec!["Google"]);
    }

    #[test]
    fn second_upsert_refreshes_fields() {
        let mut store = CatalogStore::open_in_memory().unwrap();
        store
            .upsert_problem(&sample_problem(1, "two-sum"), &[], &[])
            .unwrap();

        let mut updated = sample_problem(1, "two-sum");
        updated.likes = 9999;
        updated.status = SolvedStatus::Solved;
        updated.frequency = None;
        store.upsert_problem(&updated, &[], &[]).unwrap();

        let catalog = store.load_catalog().unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].problem.likes, 9999);
        assert_eq!(catalog[0].problem.status, SolvedStatus::Solved);
        assert_eq!(catalog[0].problem.frequency, None);
    }

    #[test]
    fn shared_topics_are_not_duplicated() {
        let mut store = CatalogStore::open_in_memory().unwrap();
        let array = [topic("Array", "array")];
        store
            .upsert_problem(&sample_problem(1, "two-sum"), &array, &[])
            .unwrap();
        store
            .upsert_problem(&sample_problem(2, "three-sum"), &array, &[])
            .unwrap();
        // Re-tagging the same problem is a no-op.
        store
            .upsert_problem(&sample_problem(1, "two-sum"), &array, &[])
            .unwrap();

        let count: u32 = store
            .conn
            .query_row("SELECT COUNT(*) FROM topics", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(store.problem_count().unwrap(), 2);
    }

    #[test]
    fn empty_store_loads_empty_catalog() {
        let store = CatalogStore::open_in_memory().unwrap();
        assert!(store.load_catalog().unwrap().is_empty());
        assert_eq!(store.problem_count().unwrap(), 0);
    }
}
