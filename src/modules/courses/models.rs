use serde::{Deserialize, Deserializer, Serialize};

/// A course catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Server-assigned identifier
    #[serde(rename = "courseid", default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(rename = "coursename", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: i64,
    /// Serialized as `null` when absent
    #[serde(default)]
    pub author: Option<Author>,
}

/// Authorship metadata embedded in a course.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    #[serde(rename = "fullname", deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub website: String,
}

/// Client-settable course fields.
///
/// Missing fields take their zero value and a `courseid` in the payload is
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseInput {
    #[serde(rename = "coursename", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub price: i64,
    pub author: Option<Author>,
}

/// Decodes an explicit JSON `null` as the field's zero value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl CourseInput {
    /// A course without a name carries no usable data.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    pub fn into_course(self, id: String) -> Course {
        Course {
            id,
            name: self.name,
            price: self.price,
            author: self.author,
        }
    }
}

/// The catalog's demo contents.
pub fn seed_courses() -> Vec<Course> {
    vec![
        Course {
            id: "1".to_string(),
            name: "C++ & DSA".to_string(),
            price: 199,
            author: Some(Author {
                full_name: "Stiver".to_string(),
                website: "takeuforward.com".to_string(),
            }),
        },
        Course {
            id: "2".to_string(),
            name: "Frontend with react".to_string(),
            price: 1999,
            author: Some(Author {
                full_name: "Akshay".to_string(),
                website: "namastedev.com".to_string(),
            }),
        },
    ]
}
