#![allow(dead_code)]

use std::fs::File;
use std::io::prelude::*;

use lazy_static::lazy_static;
use lit_template::{Context, Map, Reflect, TypeInfo, Value, ValueKind};
use serde_derive::Serialize;

#[derive(Debug, Serialize)]
pub struct Product {
    name: String,
    manufacturer: String,
    price: i32,
    summary: String,
}

impl Product {
    pub fn new() -> Product {
        Product {
            name: "Moto G".to_owned(),
            manufacturer: "Motorala".to_owned(),
            summary: "A phone".to_owned(),
            price: 100,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Review {
    title: String,
    paragraphs: Vec<String>,
}

impl Review {
    pub fn new() -> Review {
        Review {
            title: "My review".to_owned(),
            paragraphs: vec!["A".to_owned(), "B".to_owned(), "C".to_owned()],
        }
    }
}

pub struct Person {
    pub first_name: String,
    pub last_name: String,
}

pub struct Customer {
    pub person: Person,
    pub points: i64,
    pub tags: Vec<String>,
}

lazy_static! {
    static ref PERSON: TypeInfo = TypeInfo::builder::<Person>("Person")
        .field("first_name", |p| p.first_name.clone())
        .field("last_name", |p| p.last_name.clone())
        .property("initials", |p| {
            p.first_name.chars().take(1).chain(p.last_name.chars().take(1)).collect::<String>()
        })
        .method("greet", &[ValueKind::String], |p, args| format!("{}, {}", args[0], p.first_name))
        .display(|p| format!("{} {}", p.first_name, p.last_name))
        .build();
    static ref CUSTOMER: TypeInfo = TypeInfo::builder::<Customer>("Customer")
        .extends(&PERSON, |c| &c.person, |c| &mut c.person)
        .field_mut("points", |c| c.points, |c, v| match v.as_i64() {
            Some(points) => {
                c.points = points;
                true
            }
            None => false,
        })
        .property("tier", |c| if c.points >= 100 { "gold" } else { "standard" })
        .method("add_points", &[ValueKind::Int], |c, args| {
            c.points += args[0].as_i64().unwrap_or(0);
            c.points
        })
        .static_method("currency", &[], |_| "EUR")
        .iterate(|c| c.tags.iter().map(Value::from).collect())
        .build();
}

impl Reflect for Customer {
    fn type_info() -> &'static TypeInfo {
        &CUSTOMER
    }
}

pub fn customer() -> Customer {
    Customer {
        person: Person { first_name: "Ann".to_owned(), last_name: "Smith".to_owned() },
        points: 120,
        tags: vec!["vip".to_owned(), "early".to_owned()],
    }
}

pub fn full_context() -> Context {
    let mut stock = Map::new();
    stock.insert("apples".to_owned(), Value::from(3));
    stock.insert("pears".to_owned(), Value::from(0));

    let mut context = Context::new();
    context.try_insert("product", &Product::new()).unwrap();
    context.try_insert("reviews", &vec![Review::new(), Review::new()]).unwrap();
    context.insert("username", "bob");
    context.insert("friend_reviewed", true);
    context.insert("number_reviews", 2);
    context.insert("scores", vec![10, 50, 99]);
    context.insert("stock", stock);
    context.insert_object("customer", customer());
    context
}

pub fn read_file(path: &str) -> String {
    let mut f = File::open(path).unwrap();
    let mut input = String::new();
    f.read_to_string(&mut input).unwrap();
    input
}
