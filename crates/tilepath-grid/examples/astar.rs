use std::collections::HashSet;

use tilepath_grid::{Cell, find_path_detailed};

fn main() {
    let width = 10;
    let height = 10;

    // 10x10 maze, as (x, y) cells
    let obstacles: HashSet<Cell> = [
        (1, 1), (2, 1), (7, 1), (8, 1),
        (4, 2),
        (2, 3), (3, 3), (4, 3), (5, 3), (7, 3),
        (5, 4), (7, 4),
        (1, 5), (2, 5), (3, 5), (5, 5), (7, 5), (8, 5),
        (3, 6),
        (1, 7), (3, 7), (5, 7), (6, 7), (7, 7),
        (1, 8), (8, 8),
        (3, 9), (4, 9), (5, 9),
    ]
    .into_iter()
    .map(Cell::from)
    .collect();

    let start = Cell::new(0, 0);
    let goal = Cell::new(9, 9);

    println!("Grid:");
    print_grid(width, height, &obstacles, start, goal, &[]);
    println!("\nStart: {}", start);
    println!("Goal: {}", goal);

    let result = find_path_detailed(start, goal, width, height, &obstacles);
    println!("\n{}", result);

    let path = result.into_path();
    if path.is_empty() {
        println!("\nNo path found.");
    } else {
        println!("\nGrid with path:");
        print_grid(width, height, &obstacles, start, goal, &path);
    }
}

fn print_grid(
    width: usize,
    height: usize,
    obstacles: &HashSet<Cell>,
    start: Cell,
    goal: Cell,
    path: &[Cell],
) {
    // Print from top to bottom (reverse y order for visual clarity)
    for y in (0..height).rev() {
        print!("{} ", y);
        for x in 0..width {
            let cell = Cell::new(x, y);
            let symbol = if cell == start {
                "S"
            } else if cell == goal {
                "G"
            } else if path.contains(&cell) {
                "*"
            } else if obstacles.contains(&cell) {
                "X"
            } else {
                "."
            };
            print!("{} ", symbol);
        }
        println!();
    }

    print!("  ");
    for x in 0..width {
        print!("{} ", x);
    }
    println!();
}
