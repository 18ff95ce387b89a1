//! Simpletron Emulator - CLI Entry Point
//!
//! Commands:
//! - `simpletron-emu run <program>` - Load an SML deck and run it
//! - `simpletron-emu disasm <program>` - Disassemble an SML deck
//! - `simpletron-emu test` - Run the built-in self-test

use clap::{Parser, Subcommand};
use std::io;

use simpletron::sml::disasm::disassemble_word;
use simpletron::{
    disassemble, load_deck, Abend, Machine, MachineState, Opcode, Word, WordStream,
};

#[derive(Parser)]
#[command(name = "simpletron-emu")]
#[command(author = "Yigit")]
#[command(version = "0.1.0")]
#[command(about = "An emulator of the Simpletron, a 100-word decimal teaching computer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a program and run it until it halts or abends
    Run {
        /// Path to the SML deck file, or `-` to read the program from
        /// stdin (sentinel-terminated, runtime input follows)
        program: String,
        /// Maximum number of instructions to execute (default: 10000)
        #[arg(short, long, default_value = "10000")]
        max_cycles: u64,
        /// Show trace output
        #[arg(short, long)]
        trace: bool,
        /// Print the register/memory dump after the run
        #[arg(short, long)]
        dump: bool,
        /// Write a JSON snapshot of the final machine state
        #[arg(long)]
        snapshot: Option<String>,
    },
    /// Disassemble an SML deck to a readable listing
    Disasm {
        /// Path to the SML deck file
        program: String,
    },
    /// Run the built-in self-test
    Test,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run { program, max_cycles, trace, dump, snapshot }) => {
            run_program(&program, max_cycles, trace, dump, snapshot.as_deref());
        }
        Some(Commands::Disasm { program }) => {
            disassemble_file(&program);
        }
        Some(Commands::Test) => {
            run_self_test();
        }
        None => {
            println!("Simpletron Emulator v0.1.0");
            println!("A 100-word decimal teaching computer");
            println!();
            println!("Use --help for available commands");
            println!();
            demo_word_split();
        }
    }
}

fn run_program(path: &str, max_cycles: u64, trace: bool, dump: bool, snapshot: Option<&str>) {
    let mut machine = Machine::new();
    let stdin = io::stdin();
    let mut input = WordStream::new(stdin.lock());
    let mut out = io::stdout();

    // Load the program: from the deck file, or from the front of stdin
    // when the path is `-` (the runtime input then follows the sentinel).
    let loaded = if path == "-" {
        println!("🔧 Loading program from stdin");
        machine.load_program(&mut input, &mut out)
    } else {
        println!("🔧 Loading: {}", path);
        let deck = match load_deck(path) {
            Ok(deck) => deck,
            Err(e) => {
                eprintln!("❌ Failed to load deck: {}", e);
                std::process::exit(1);
            }
        };
        machine.load_words(&deck.words, &mut out)
    };

    let count = match loaded {
        Ok(count) => count,
        Err(e) => {
            eprintln!("❌ Program load failed: {}", e);
            std::process::exit(1);
        }
    };

    if count == 0 {
        eprintln!("❌ No words to execute");
        std::process::exit(1);
    }

    println!("📂 Loaded {} words", count);
    println!();
    println!("━━━ Execution ━━━");

    while machine.is_running() && machine.cycles < max_cycles {
        let pc = machine.regs.instruction_counter;

        match machine.step(&mut input, &mut out) {
            Ok(_) => {
                if trace {
                    if let Some(instr) = machine.last_instruction() {
                        println!(
                            "{:02}: {:<14} acc={}",
                            pc,
                            disassemble_word(simpletron::machine::decode::encode(instr)),
                            machine.regs.accumulator
                        );
                    }
                }
            }
            Err(e) => {
                eprintln!("❌ I/O error at PC={}: {}", pc, e);
                std::process::exit(1);
            }
        }
    }

    println!();
    println!("━━━ Result ━━━");
    println!("Cycles: {}", machine.cycles);
    println!("State: {:?}", machine.state);
    println!("Accumulator: {}", machine.regs.accumulator);

    if machine.is_running() {
        println!();
        println!("⚠️  Reached max cycles limit ({}). Use --max-cycles to increase.", max_cycles);
    }

    if dump {
        print!("{}", machine.dump());
    }

    if let Some(snapshot_path) = snapshot {
        match serde_json::to_string_pretty(&machine) {
            Ok(json) => {
                if let Err(e) = std::fs::write(snapshot_path, json) {
                    eprintln!("❌ Failed to write snapshot: {}", e);
                    std::process::exit(1);
                }
                println!("✓ Snapshot saved to {}", snapshot_path);
            }
            Err(e) => {
                eprintln!("❌ Failed to serialize machine state: {}", e);
                std::process::exit(1);
            }
        }
    }

    if matches!(machine.state, MachineState::Abended(_)) {
        std::process::exit(1);
    }
}

fn disassemble_file(path: &str) {
    println!("📖 Disassembling: {}", path);
    println!();

    let deck = match load_deck(path) {
        Ok(deck) => deck,
        Err(e) => {
            eprintln!("❌ Failed to load deck: {}", e);
            std::process::exit(1);
        }
    };

    print!("{}", disassemble(&deck.words));
}

fn demo_word_split() {
    println!("━━━ Instruction Word Demo ━━━");
    println!();

    println!("Words (sign + four decimal digits, range -9999 to +9999):");
    let word = Word::new(1109);
    println!("  {} splits into operation code 11 (READ) and operand 09", word);
    let halt = Word::new(4400);
    println!("  {} splits into operation code 44 (HALT)", halt);
    println!();

    println!("The twelve operations:");
    for op in Opcode::ALL {
        println!("  {:02}  {}", op.code(), op.mnemonic());
    }
}

fn run_self_test() {
    use std::io::Cursor;

    println!("━━━ Simpletron Emulator Self-Test ━━━");
    println!();

    let mut passed = 0;
    let mut failed = 0;

    // Test 1: Word formatting
    print!("Word sign+digit formatting... ");
    if Word::new(5).to_string() == "+0005" && Word::new(-42).to_string() == "-0042" {
        println!("✓"); passed += 1;
    } else {
        println!("✗"); failed += 1;
    }

    // Test 2: Decode roundtrip
    print!("Instruction encode/decode roundtrip... ");
    let mut ok = true;
    for op in Opcode::ALL {
        let instr = simpletron::Instruction { opcode: op, operand: 7 };
        let encoded = simpletron::machine::decode::encode(instr);
        if simpletron::machine::decode::decode(encoded) != Ok(instr) {
            ok = false;
            break;
        }
    }
    if ok { println!("✓"); passed += 1; }
    else { println!("✗"); failed += 1; }

    // Test 3: Read-add-write program
    print!("Read/add/write program... ");
    let mut machine = Machine::new();
    let mut out = Vec::new();
    let mut words = WordStream::new(Cursor::new(
        "1109 1110 2209 3110 2111 1211 4400 -99999 5 3".to_string(),
    ));
    let run_ok = machine.load_program(&mut words, &mut out).is_ok()
        && machine.run(&mut words, &mut out).is_ok();
    if run_ok && machine.is_halted() && machine.regs.accumulator == Word::new(8) {
        println!("✓"); passed += 1;
    } else {
        println!("✗"); failed += 1;
    }

    // Test 4: Overflow abend
    print!("Overflow abend... ");
    let mut machine = Machine::new();
    let mut out = Vec::new();
    let mut words = WordStream::new(Cursor::new("2203 3104 4400 9999 1".to_string()));
    let run_ok = machine.load_program(&mut words, &mut out).is_ok()
        && machine.run(&mut words, &mut out).is_ok();
    if run_ok && machine.state == MachineState::Abended(Abend::Overflow) {
        println!("✓"); passed += 1;
    } else {
        println!("✗"); failed += 1;
    }

    // Test 5: Dump idempotence
    print!("Dump idempotence... ");
    let machine = Machine::new();
    if machine.dump() == machine.dump() {
        println!("✓"); passed += 1;
    } else {
        println!("✗"); failed += 1;
    }

    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Results: {} passed, {} failed", passed, failed);

    if failed == 0 {
        println!("✓ All tests passed!");
    } else {
        std::process::exit(1);
    }
}
