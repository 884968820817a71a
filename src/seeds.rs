//! Built-in puzzle bank: a handful of Kotlin-behavior puzzlers that keep
//! the engine useful with no external config. Prompts are opaque snippets
//! to the engine; it never parses or runs them.

use crate::domain::PuzzleDef;

pub fn seed_puzzles() -> Vec<PuzzleDef> {
  vec![
    PuzzleDef {
      id: "kt-nonlocal-return".into(),
      category: "control-flow".into(),
      prompt: r#"fun test() {
    val items = listOf(1.0, 2.0, 3.0)
    items.forEach {
        if (it == 3.0) return
        print("%.0f".format(it))
    }
    print("done")
}

test()

// What will it print?"#
        .into(),
      choices: vec![
        "123done".into(),
        "12done".into(),
        "12".into(),
        "Will not compile".into(),
      ],
      correct: vec![2],
      multi_select: false,
      explanation: "A bare `return` inside a lambda passed to an inline function like \
`forEach` is non-local: it returns from `test` itself, not just the lambda. The loop \
prints 1 and 2, hits 3.0, and leaves `test` before `print(\"done\")` runs."
        .into(),
    },
    PuzzleDef {
      id: "kt-double-int-equality".into(),
      category: "types".into(),
      prompt: r#"fun test() {
    val items = listOf(1.0, 2.0, 3.0)
    items.forEach {
        if (it == 3) return
        print("%.0f".format(it))
    }
    print("done")
}

test()

// What will it print?"#
        .into(),
      choices: vec![
        "123done".into(),
        "12done".into(),
        "12".into(),
        "Will not compile".into(),
      ],
      correct: vec![3],
      multi_select: false,
      explanation: "`it` is a `Double` and `3` is an `Int`. Kotlin refuses `==` between \
unrelated numeric types, so the comparison is a compile error. Change the literal to \
`3.0` and the snippet compiles (and then returns non-locally)."
        .into(),
    },
    PuzzleDef {
      id: "kt-smart-cast-capture".into(),
      category: "concurrency".into(),
      prompt: r#"var obj: Any = "Kotlin"
if (obj is String) {
    Thread {
        obj = 42
    }.start()
    println(obj.length) // What happens here?
}

// What will happen when running this code?"#
        .into(),
      choices: vec![
        "It prints 6".into(),
        "It throws ClassCastException".into(),
        "It prints 42".into(),
        "It will not compile".into(),
      ],
      correct: vec![3],
      multi_select: false,
      explanation: "The smart cast from `Any` to `String` is rejected: `obj` is a mutable \
variable captured and written by the thread lambda, so the compiler cannot guarantee it \
is still a `String` at `obj.length`. The snippet fails to compile."
        .into(),
    },
    PuzzleDef {
      id: "kt-map-delegate-snapshot".into(),
      category: "delegation".into(),
      prompt: r#"class Group(var names: Map<String, String>) {
    val he by names
    val she by names
}

val group = Group(mapOf(
    "he" to "Hanna",
    "she" to "Jack"
))

group.names = emptyMap()

println("He is ${group.he} and She is ${group.she}")

// What will it print?"#
        .into(),
      choices: vec![
        "He is Hanna and She is Jack".into(),
        "He is null and She is null".into(),
        "He is he and She is she".into(),
        "NullPointerException".into(),
      ],
      correct: vec![0],
      multi_select: false,
      explanation: "Property delegation binds to the map instance passed to the \
constructor, not to the `names` property. Reassigning `names` later does not rebind the \
delegates, so they keep reading the original map."
        .into(),
    },
    PuzzleDef {
      id: "kt-string-template".into(),
      category: "formatting".into(),
      prompt: r#"fun greet(name: String) {
    val msg = "Hello, " + name + "!"
    println(msg)
}

// What's the cleaner, idiomatic approach?"#
        .into(),
      choices: vec![
        "Keep concatenation".into(),
        "Use `StringBuilder`".into(),
        "Use string template `\"Hello, $name!\"`".into(),
        "Use `format`".into(),
      ],
      correct: vec![2],
      multi_select: false,
      explanation: "String templates are the idiomatic Kotlin way to interpolate a value \
into a short string; concatenation and `StringBuilder` add noise for no benefit at this \
size, and `format` buys nothing here."
        .into(),
    },
    PuzzleDef {
      id: "kt-trailing-lambda-defaults".into(),
      category: "functions".into(),
      prompt: r#"typealias f = (Int) -> Unit

fun startCounting(one: f = {}, two: f = {}) {
    one(1)
    two(2)
}

startCounting { print(it) }
startCounting({ print(it) })

// What will it print?"#
        .into(),
      choices: vec!["11".into(), "22".into(), "12".into(), "21".into()],
      correct: vec![3],
      multi_select: false,
      explanation: "A trailing lambda always binds to the last parameter, so the first \
call fills `two` and prints 2. A parenthesized lambda binds positionally, so the second \
call fills `one` and prints 1. Together: 21."
        .into(),
    },
  ]
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::Catalog;
  use crate::grading::grade;
  use crate::domain::Verdict;

  #[test]
  fn seed_bank_loads_cleanly() {
    let catalog = Catalog::load(seed_puzzles()).expect("seed catalog");
    assert!(catalog.len() >= 4);
  }

  #[test]
  fn grading_agrees_with_every_seed_answer_key() {
    let catalog = Catalog::load(seed_puzzles()).expect("seed catalog");
    for puzzle in catalog.iter() {
      assert_eq!(
        grade(puzzle, &puzzle.correct_choices),
        Verdict::Correct,
        "answer key for {} should grade as correct",
        puzzle.id
      );
    }
  }
}
