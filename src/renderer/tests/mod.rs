use lazy_static::lazy_static;
use serde_derive::Serialize;

use crate::reflect::{Reflect, TypeInfo};
use crate::value::Value;

mod basic;

#[derive(Debug, Serialize)]
pub struct Review {
    title: String,
    paragraphs: Vec<String>,
    stars: u8,
}

impl Review {
    pub fn new() -> Review {
        Review {
            title: "My review".to_owned(),
            paragraphs: vec!["A".to_owned(), "B".to_owned(), "C".to_owned()],
            stars: 4,
        }
    }
}

pub struct Shape {
    pub sides: i64,
}

pub struct Square {
    pub shape: Shape,
    pub length: f64,
    pub tags: Vec<String>,
}

lazy_static! {
    static ref SHAPE: TypeInfo = TypeInfo::builder::<Shape>("Shape")
        .field("sides", |s| s.sides)
        .property("kind", |s| if s.sides == 4 { "quad" } else { "other" })
        .display(|s| format!("shape with {} sides", s.sides))
        .build();
    static ref SQUARE: TypeInfo = TypeInfo::builder::<Square>("Square")
        .extends(&SHAPE, |s| &s.shape, |s| &mut s.shape)
        .field("length", |s| s.length)
        .property("area", |s| s.length * s.length)
        .iterate(|s| s.tags.iter().map(Value::from).collect())
        .build();
}

impl Reflect for Square {
    fn type_info() -> &'static TypeInfo {
        &SQUARE
    }
}

pub fn square() -> Square {
    Square { shape: Shape { sides: 4 }, length: 1.5, tags: vec!["red".into(), "small".into()] }
}
