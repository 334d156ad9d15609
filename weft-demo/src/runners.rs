//! The demonstrations themselves. Each one builds a computation, materializes
//! it and prints the outcome.

use crate::render::render;
use anyhow::Result;
use std::fmt::Display;
use tracing::info;
use weft::prelude::*;

fn print_stream<T>(title: &str, pipeline: &StreamPipeline<T>) -> Result<()>
where
    T: Display + Clone + Send + Sync + 'static,
{
    let items = pipeline.collect_to_list().materialize()?;
    println!();
    println!("{title}");
    println!("{}", render(&items));
    Ok(())
}

/// Deferred list transformations over `[1, 2, 3, 4, 5]`.
pub fn run_list() -> Result<()> {
    info!("running list demonstrations");
    let original = vec![1, 2, 3, 4, 5];

    let appended = list::append(original.clone(), 4).materialize()?;
    println!("List after append: {appended:?}");

    let prepended = list::prepend(original.clone(), 1).materialize()?;
    println!("List after prepend: {prepended:?}");

    let reversed = list::reverse(original.clone()).materialize()?;
    println!("Reversed list: {reversed:?}");

    let dropped = list::drop(original.clone(), 2).materialize()?;
    println!("List after drop: {dropped:?}");

    let dropped_while = list::drop_while(original.clone(), |v| *v < 3).materialize()?;
    println!("List after dropWhile: {dropped_while:?}");

    let taken = list::take(original.clone(), 3).materialize()?;
    println!("List after take: {taken:?}");

    let taken_while = list::take_while(original.clone(), |v| *v <= 3).materialize()?;
    println!("List after takeWhile: {taken_while:?}");

    let removed = list::remove(original.clone(), 3).materialize()?;
    println!("List after removing element: {removed:?}");

    let concatenated = list::concatenate(vec![1, 2, 3], vec![4, 5, 6]).materialize()?;
    println!("Concatenated lists: {concatenated:?}");

    let replaced = list::replace(original.clone(), 3, 22).materialize()?;
    println!("List after replacing value: {replaced:?}");

    let numbers = original;
    let size = list::size(numbers.clone()).materialize()?;
    println!("List size: {size}");

    let mapped = list::map(numbers.clone(), |n| format!("Mapped: {n}")).materialize()?;
    println!("{mapped:?}");

    let folded = list::fold(numbers, 0, |acc, n| acc + n).materialize()?;
    println!("Folding result: {folded}");

    Ok(())
}

/// The skip/take/filter family of stages, each applied to `flux3`.
fn shaping_sections(flux3: &StreamPipeline<i32>) -> Vec<(&'static str, StreamPipeline<i32>)> {
    vec![
        ("Stream-Drop", flux3.skip(2)),
        ("Stream-DropWhile", flux3.drop_while(|n| *n < 3)),
        ("Stream-Take", flux3.take(3)),
        ("Stream-TakeWhile", flux3.take_while(|n| *n <= 3)),
        ("Stream-Filter-Even", flux3.filter(|n| n % 2 == 0)),
        ("Stream-Filter-Odd", flux3.filter(|n| n % 2 != 0)),
        ("Stream-Invert", flux3.invert()),
        ("Stream-Remove", flux3.remove(3)),
        ("Stream-Replace", flux3.replace(3, 10)),
    ]
}

/// Stream pipelines over the small literal fluxes.
pub fn run_stream() -> Result<()> {
    info!("running stream demonstrations");
    let flux1 = StreamPipeline::just([1, 2, 3]);
    let flux2 = StreamPipeline::just([4, 5, 6]);
    let flux3 = StreamPipeline::just([1, 2, 3, 4, 5, 6]);

    let fluxa = StreamPipeline::just([7, 8, 9]);
    let fluxb = StreamPipeline::just([4, 3, 2]);
    print_stream("Stream-Append", &fluxa.concat(&fluxb))?;
    print_stream("Stream-Prepend", &flux1.concat(&flux2))?;

    let first = StreamPipeline::from_vec(vec![1, 2, 3]);
    let second = StreamPipeline::from_vec(vec![4, 5, 6]);
    print_stream("Stream-Concatenate", &first.concat(&second))?;

    for (title, pipeline) in shaping_sections(&flux3) {
        print_stream(title, &pipeline)?;
    }

    println!();
    println!("Stream-Size");
    flux3.count().subscribe(
        |size| println!("{size}"),
        |err| tracing::error!(error = %err, "count failed"),
    );

    print_stream("Stream-Map", &flux1.map(|x| x * 2))?;

    println!();
    println!("Stream-Reduction");
    let sum = flux1.reduce(0, |acc, v| acc + v).materialize()?;
    println!("{sum}");

    print_stream("Stream-Folding", &flux1.scan(1, |acc, v| acc * v))?;

    Ok(())
}
