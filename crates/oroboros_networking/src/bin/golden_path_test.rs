//! # Golden Path Integration Test
//!
//! OPERATION COLD FUSION - Testing the complete integration flow.
//!
//! Tests the full path:
//! 1. Client → BreakBlock action
//! 2. Server validates (Unit 4)
//! 3. Unit 3 calculates loot
//! 4. Unit 1 updates world/inventory
//! 5. Event broadcast
//! 6. Visual feedback (Unit 2)
//!
//! Target: < 50ms total latency

use oroboros_networking::integration::actions::GoldenPathTest;

fn main() {
    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║         OPERATION COLD FUSION - GOLDEN PATH TEST                 ║");
    println!("║         Testing complete Unit 1-2-3-4 integration                ║");
    println!("╠══════════════════════════════════════════════════════════════════╣");
    println!("║  Target: All actions must complete in < 50ms                     ║");
    println!("║                                                                  ║");
    println!("║  Flow: Client → Server → Economy → Memory → Client → Render      ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    
    let mut test = GoldenPathTest::new();
    test.run_all();
    test.print_results();
    
    if test.all_passed() {
        std::process::exit(0);
    } else {
        std::process::exit(1);
    }
}
