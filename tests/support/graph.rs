use tradecut::domain::TradeGraph;

/// Unit-weight cycle through `names` in order.
pub fn cycle(names: &[&str]) -> TradeGraph {
    let mut graph = TradeGraph::new();
    for (i, name) in names.iter().enumerate() {
        graph
            .add_trade_desire(*name, names[(i + 1) % names.len()])
            .expect("distinct names");
    }
    graph
}

pub fn triangle() -> TradeGraph {
    cycle(&["A", "B", "C"])
}

/// The Alice/Bob/Charlie/David barter cycle.
pub fn barter_cycle() -> TradeGraph {
    cycle(&["Alice_Bike", "Bob_Laptop", "Charlie_Guitar", "David_Camera"])
}

pub fn two_triangles() -> TradeGraph {
    let mut graph = triangle();
    graph.add_trade_desire("X", "Y").expect("distinct names");
    graph.add_trade_desire("Y", "Z").expect("distinct names");
    graph.add_trade_desire("Z", "X").expect("distinct names");
    graph
}
