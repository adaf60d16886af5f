use std::cmp::Ordering;
use std::ops::ControlFlow;

use slot_collection::contiguous::collection::INITIAL_CAP;
use slot_collection::contiguous::{Collection, Slot};

#[derive(Debug, Clone, PartialEq)]
struct Person {
    name: String,
    age: u32,
}

impl Person {
    fn new(name: &str, age: u32) -> Box<Person> {
        Box::new(Person {
            name: name.to_owned(),
            age,
        })
    }
}

const PEOPLE: [(&str, u32); 5] = [
    ("Viorel", 37),
    ("Evelyn", 6),
    ("Popescu", 33),
    ("John", 31),
    ("Jane", 27),
];

fn by_age(a: &Person, b: &Person) -> Ordering {
    a.age.cmp(&b.age)
}

fn by_name(a: &Person, b: &Person) -> Ordering {
    a.name.cmp(&b.name)
}

fn find_by_name(name: &str, person: &Person) -> Ordering {
    name.cmp(&person.name)
}

#[test]
fn test_people_lifecycle() {
    let mut destroyed = Vec::new();
    let mut destroy = |slot: Slot<Box<Person>>| {
        if let Slot::Occupied(person) = slot {
            destroyed.push(person.name);
        }
    };

    let mut people = Collection::new();
    for (name, age) in PEOPLE {
        people.push(Person::new(name, age)).expect("push should succeed");
    }
    assert_eq!(people.len(), 5);
    assert!(people.cap() > people.len());
    assert_eq!(people.cap() % INITIAL_CAP, 0);
    assert_eq!(people.get(0).map(|p| p.age), Some(37));

    // Pop hands back the last person, who goes straight back in.
    let jane = people.pop().expect("collection isn't empty").unwrap();
    assert_eq!(*jane, *Person::new("Jane", 27));
    assert_eq!(people.len(), 4);
    people.push(jane).expect("push should succeed");

    people.unshift(Person::new("First", 10)).expect("unshift should succeed");
    assert_eq!(people.len(), 6);
    assert_eq!(people.get(0).map(|p| p.name.as_str()), Some("First"));
    assert_eq!(people.get(5).map(|p| p.name.as_str()), Some("Jane"));

    let first = people.shift().expect("collection isn't empty").unwrap();
    assert_eq!((first.name.as_str(), first.age), ("First", 10));
    assert_eq!(people.len(), 5);

    people.unset_multi_with(1, 3, &mut destroy).expect("slots 1..4 are occupied");
    assert_eq!(people.slot(1), Some(Slot::Hole));
    assert_eq!(people.slot(2), Some(Slot::Hole));
    assert_eq!(people.slot(3), Some(Slot::Hole));
    assert_eq!(people.len(), 5);

    let last = people.get(4).map(|p| p.name.clone());
    assert_eq!(people.compact(), 3);
    assert_eq!(people.len(), 2);
    assert_eq!(people.get(1).map(|p| p.name.clone()), last);

    let cap = people.cap();
    people.reset_with(&mut destroy);
    assert_eq!(people.cap(), cap);
    assert_eq!(people.len(), 0);
    assert_eq!(people.get(0), None);

    drop(destroy);
    assert_eq!(destroyed, ["Evelyn", "Popescu", "John", "Viorel", "Jane"]);
}

#[test]
fn test_people_sort_and_find() {
    let people: Vec<Box<Person>> = PEOPLE
        .iter()
        .map(|&(name, age)| Person::new(name, age))
        .collect();
    let mut col: Collection<&Box<Person>> = people.iter().collect();

    col.sort(|a, b| by_age(a, b));
    let mut prev = 0;
    let visited = col.walk(&mut prev, |slot, prev| {
        let age = slot.unwrap().age;
        assert!(*prev < age, "Ages should be strictly ascending after sorting by age.");
        *prev = age;
        ControlFlow::Continue(())
    });
    assert_eq!(visited, 5);

    col.sort(|a, b| by_name(a, b));
    let evelyn = col
        .find("Evelyn", |key, person| find_by_name(key, person))
        .expect("Evelyn is present");
    assert!(
        std::ptr::eq(*evelyn, &people[1]),
        "Find should return the same reference that was inserted."
    );
    assert_eq!(evelyn.age, 6);

    assert_eq!(col.find("Nobody", |key, person| find_by_name(key, person)), None);
}

#[test]
fn test_destroy_hands_every_slot_over() {
    let mut col: Collection<_> = PEOPLE
        .iter()
        .map(|&(name, age)| Person::new(name, age))
        .collect();
    col.unset(2).expect("slot 2 is occupied");

    let mut names = Vec::new();
    let mut holes = 0;
    col.destroy_with(|slot| match slot {
        Slot::Occupied(person) => names.push(person.name),
        Slot::Hole => holes += 1,
    });

    assert_eq!(names, ["Viorel", "Evelyn", "John", "Jane"]);
    assert_eq!(holes, 1);
}
