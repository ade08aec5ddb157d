use rusqlite::Connection;

use crate::{Error, entry::Category, month::YearMonth};

/// The sum of a month's expenses in a single category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: i64,
}

/// Sum the expenses in `month` by category, largest total first.
///
/// Categories with equal totals are ordered by name. Income entries are ignored.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_expenses_by_category(
    month: YearMonth,
    connection: &Connection,
) -> Result<Vec<CategoryTotal>, Error> {
    connection
        .prepare(
            "SELECT category, SUM(amount) AS total
            FROM kakeibo
            WHERE type = 'expense' AND date BETWEEN ?1 AND ?2
            GROUP BY category
            ORDER BY total DESC, category",
        )?
        .query_map((month.first_day(), month.last_day()), |row| {
            Ok(CategoryTotal {
                category: row.get(0)?,
                total: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        entry::{Category, Entry, EntryType, create_entry},
        graph::query::{CategoryTotal, get_expenses_by_category},
        month::YearMonth,
        test_utils::get_test_connection,
    };

    #[test]
    fn groups_expenses_by_category() {
        let connection = get_test_connection();
        let entries = [
            (date!(2024 - 03 - 01), EntryType::Expense, 300, "transport"),
            (date!(2024 - 03 - 05), EntryType::Expense, 1000, "food"),
            (date!(2024 - 03 - 09), EntryType::Expense, 500, "food"),
            (date!(2024 - 03 - 10), EntryType::Expense, 300, "books"),
            (date!(2024 - 03 - 25), EntryType::Income, 250000, "salary"),
            (date!(2024 - 04 - 01), EntryType::Expense, 9999, "rent"),
        ];
        for (date, entry_type, amount, category) in entries {
            create_entry(
                Entry::build(date, entry_type, amount, Category::new_unchecked(category)),
                &connection,
            )
            .unwrap();
        }

        let totals = get_expenses_by_category(YearMonth::new(2024, 3).unwrap(), &connection)
            .expect("could not get expenses by category");

        assert_eq!(
            totals,
            vec![
                CategoryTotal {
                    category: Category::new_unchecked("food"),
                    total: 1500
                },
                CategoryTotal {
                    category: Category::new_unchecked("books"),
                    total: 300
                },
                CategoryTotal {
                    category: Category::new_unchecked("transport"),
                    total: 300
                },
            ]
        );
    }

    #[test]
    fn month_without_expenses_is_empty() {
        let connection = get_test_connection();
        create_entry(
            Entry::build(
                date!(2024 - 03 - 25),
                EntryType::Income,
                250000,
                Category::new_unchecked("salary"),
            ),
            &connection,
        )
        .unwrap();

        let totals =
            get_expenses_by_category(YearMonth::new(2024, 3).unwrap(), &connection).unwrap();

        assert!(totals.is_empty());
    }
}
